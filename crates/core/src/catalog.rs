//! Wire shape of the `nextraces` endpoint and its conversion into a [`Snapshot`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::event::{CategoryId, Event, Snapshot};

/// Raw catalog as returned by an event source: race id -> summary.
pub type RaceCatalog = HashMap<String, RaceSummary>;

/// Top-level body of `GET /racing/?method=nextraces`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextRacesResponse {
    pub data: NextRacesData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextRacesData {
    #[serde(default)]
    pub race_summaries: RaceCatalog,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceSummary {
    pub race_id: String,
    pub meeting_name: String,
    pub race_number: u32,
    pub advertised_start: AdvertisedStart,
    pub category_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdvertisedStart {
    pub seconds: i64,
}

impl NextRacesResponse {
    pub fn into_catalog(self) -> RaceCatalog {
        self.data.race_summaries
    }
}

impl From<RaceSummary> for Event {
    fn from(summary: RaceSummary) -> Self {
        Self {
            id: summary.race_id,
            group_name: summary.meeting_name,
            sequence_number: summary.race_number,
            scheduled_start: summary.advertised_start.seconds,
            category: CategoryId::from(summary.category_id),
        }
    }
}

/// Flatten a catalog into domain events.
///
/// No field validation happens here; shape errors surface when the body is
/// decoded by the source.
pub fn normalize(catalog: RaceCatalog) -> Snapshot {
    catalog.into_values().map(Event::from).collect()
}
