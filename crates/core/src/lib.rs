//! Race feed domain types and the pure parts of the feed pipeline.
//!
//! Everything here is synchronous and side-effect free apart from [`clock`].
//! The polling loops that drive these functions live in `racefeed-daemon`.

pub mod catalog;
pub mod clock;
pub mod countdown;
pub mod event;
pub mod source;
pub mod window;

pub use catalog::{RaceCatalog, normalize};
pub use clock::{Clock, SystemClock};
pub use event::{CategoryId, Event, Snapshot};
pub use source::{EventSource, SourceError};
pub use window::{GRACE_PERIOD_SECS, MAX_DISPLAY, WindowPolicy};

#[cfg(any(test, feature = "testing"))]
pub mod testing;
