use crate::catalog::{AdvertisedStart, RaceCatalog, RaceSummary};
use crate::event::{CategoryId, Event};

pub const GREYHOUND: &str = "9daef0d7-bf3c-4f50-921d-8e818c60fe61";
pub const HARNESS: &str = "161d9be2-e909-4326-8c2c-35ed71fb460b";
pub const HORSE: &str = "4a2788f8-e825-4d36-9894-efd4baf1cfae";

/// Event with a generated meeting name and race number 1.
pub fn event(id: &str, scheduled_start: i64, category: &str) -> Event {
    Event {
        id: id.to_string(),
        group_name: format!("Meeting {id}"),
        sequence_number: 1,
        scheduled_start,
        category: CategoryId::from(category),
    }
}

/// Wire summary with every field spelled out.
pub fn summary(
    race_id: &str,
    meeting_name: &str,
    race_number: u32,
    seconds: i64,
    category_id: &str,
) -> RaceSummary {
    RaceSummary {
        race_id: race_id.to_string(),
        meeting_name: meeting_name.to_string(),
        race_number,
        advertised_start: AdvertisedStart { seconds },
        category_id: category_id.to_string(),
    }
}

/// Catalog keyed by race id, the way the API returns it.
pub fn catalog(events: &[Event]) -> RaceCatalog {
    events
        .iter()
        .map(|e| {
            (
                e.id.clone(),
                summary(
                    &e.id,
                    &e.group_name,
                    e.sequence_number,
                    e.scheduled_start,
                    e.category.as_str(),
                ),
            )
        })
        .collect()
}
