use chrono::{DateTime, Duration, Utc};

use crate::error::{Error, Result};
use crate::models::{Location, MS_PER_HOUR};

struct Site {
    city: &'static str,
    address: &'static str,
    latitude: f64,
    longitude: f64,
}

const SITES: [Site; 5] = [
    Site {
        city: "Amsterdam",
        address: "Piet Heinkade 55",
        latitude: 52.370216,
        longitude: 4.895168,
    },
    Site {
        city: "Rotterdam",
        address: "Wilhelminakade 123",
        latitude: 51.924420,
        longitude: 4.477733,
    },
    Site {
        city: "Utrecht",
        address: "Croeselaan 18",
        latitude: 52.092876,
        longitude: 5.104480,
    },
    Site {
        city: "The Hague",
        address: "Prinses Beatrixlaan 582",
        latitude: 52.078663,
        longitude: 4.288788,
    },
    Site {
        city: "Eindhoven",
        address: "Kennedyplein 200",
        latitude: 51.441642,
        longitude: 5.469722,
    },
];

/// Builds the fixed list of fleet charging locations.
///
/// Sites cycle through the five Dutch cities; from the sixth location on the
/// name carries a site number. Creation times are staggered by one hour from
/// `origin`.
pub fn generate_locations(count: usize, origin: DateTime<Utc>) -> Result<Vec<Location>> {
    (0..count)
        .map(|idx| {
            let site = &SITES[idx % SITES.len()];
            let round = idx / SITES.len();
            let name = if round == 0 {
                format!("ACME Fleet Charging - {}", site.city)
            } else {
                format!("ACME Fleet Charging - {} {}", site.city, round + 1)
            };
            let offset_ms = (idx as u64).saturating_mul(MS_PER_HOUR);
            let last_updated = Duration::try_hours(idx as i64)
                .and_then(|offset| origin.checked_add_signed(offset))
                .ok_or(Error::TimeOverflow(offset_ms))?;

            Ok(Location {
                id: format!("ACME-LOC-{:03}", idx + 1),
                name,
                address: site.address.to_string(),
                city: Some(site.city.to_string()),
                country: Some("NL".to_string()),
                latitude: Some(site.latitude),
                longitude: Some(site.longitude),
                last_updated,
            })
        })
        .collect()
}
