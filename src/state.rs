use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Cdr, Location};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RunMetadata {
    pub seed: u64,
    pub vehicles: usize,
    pub stations: usize,
    pub capacity_per_station: u32,
    pub horizon_hours: u64,
    pub start: DateTime<Utc>,
    pub events_processed: u64,
    /// Sessions cut off by the horizon: vehicles queued at or charging on a
    /// station when the clock stopped.
    pub abandoned_sessions: usize,
}

/// Immutable result of the one-time seeding run, handed to whatever serves it.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Dataset {
    pub metadata: RunMetadata,
    pub locations: Vec<Location>,
    pub cdrs: Vec<Cdr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LocationSummary {
    pub location_id: String,
    pub sessions: u32,
    pub energy_kwh: f64,
    pub revenue: f64,
}

impl Dataset {
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|location| location.id == id)
    }

    pub fn cdr(&self, id: &str) -> Option<&Cdr> {
        self.cdrs.iter().find(|cdr| cdr.id == id)
    }

    pub fn cdrs_at<'a>(&'a self, location_id: &'a str) -> impl Iterator<Item = &'a Cdr> + 'a {
        self.cdrs
            .iter()
            .filter(move |cdr| cdr.location_id == location_id)
    }

    /// Per-location totals in location order.
    pub fn location_summaries(&self) -> Vec<LocationSummary> {
        self.locations
            .iter()
            .map(|location| {
                let mut summary = LocationSummary {
                    location_id: location.id.clone(),
                    sessions: 0,
                    energy_kwh: 0.0,
                    revenue: 0.0,
                };
                for cdr in self.cdrs_at(&location.id) {
                    summary.sessions += 1;
                    summary.energy_kwh += cdr.total_energy;
                    summary.revenue += cdr.total_cost;
                }
                summary
            })
            .collect()
    }
}
