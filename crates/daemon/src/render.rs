//! Plain-text rendering of the feed state.

use racefeed_core::countdown::format_countdown;
use racefeed_runtime_config::FeedConfig;

use crate::state::{DisplayStatus, FeedState};

/// Render the list with countdowns relative to `now`.
pub fn render(state: &FeedState, now: i64, filter: Option<&str>, config: &FeedConfig) -> String {
    let heading = match filter {
        Some(id) => config.category_label(id).unwrap_or(id),
        None => "All",
    };
    let mut out = format!("Next to go: {heading}\n");

    match state.display_status() {
        DisplayStatus::Loading => out.push_str("  Loading...\n"),
        DisplayStatus::Error(message) => out.push_str(&format!("  Error: {message}\n")),
        DisplayStatus::Empty => out.push_str("  No races available\n"),
        DisplayStatus::Events(events) => {
            for event in events {
                let category = config
                    .category_label(event.category.as_str())
                    .unwrap_or("Other");
                out.push_str(&format!(
                    "  {:<28} R{:<3} {:<10} {}\n",
                    event.group_name,
                    event.sequence_number,
                    category,
                    format_countdown(event.scheduled_start, now)
                ));
            }
            if state.is_loading {
                out.push_str("  (refreshing)\n");
            }
        }
    }
    out
}
