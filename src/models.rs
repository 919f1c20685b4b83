use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parameters of one fleet simulation run.
///
/// Every field has a default so partial TOML/JSON files are accepted. The
/// defaults describe the ACME fleet: 20 vehicles sharing 5 locations with two
/// charging slots each over one week.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FleetConfig {
    pub seed: u64,
    pub vehicles: usize,
    pub stations: usize,
    pub capacity_per_station: u32,
    pub horizon_hours: u64,
    pub arrival_min_minutes: u64,
    pub arrival_max_minutes: u64,
    pub battery_min_percent: f64,
    pub battery_max_percent: f64,
    pub charge_target_percent: f64,
    pub battery_capacity_kwh: f64,
    pub charging_speed_kw: f64,
    pub price_per_kwh: f64,
    /// Wall-clock instant that virtual time zero maps to. The simulation core
    /// never reads the system clock; callers that leave this unset get the
    /// Unix epoch.
    pub start: Option<DateTime<Utc>>,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            vehicles: 20,
            stations: 5,
            capacity_per_station: 2,
            horizon_hours: 7 * 24,
            arrival_min_minutes: 15,
            arrival_max_minutes: 120,
            battery_min_percent: 10.0,
            battery_max_percent: 40.0,
            charge_target_percent: 80.0,
            battery_capacity_kwh: 75.0,
            charging_speed_kw: 50.0,
            price_per_kwh: 0.35,
            start: None,
        }
    }
}

impl FleetConfig {
    pub fn origin(&self) -> DateTime<Utc> {
        self.start.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn horizon_ms(&self) -> u64 {
        self.horizon_hours.saturating_mul(MS_PER_HOUR)
    }

    pub fn validate(&self) -> Result<()> {
        if self.stations == 0 {
            return Err(Error::EmptyStations);
        }
        if self.capacity_per_station == 0 {
            return Err(Error::CapacityZero);
        }
        if self.horizon_hours == 0 {
            return Err(Error::HorizonZero);
        }
        let window_ok = self.arrival_max_minutes > 0
            && self.arrival_min_minutes <= self.arrival_max_minutes
            && self.arrival_max_minutes.checked_mul(MS_PER_MINUTE).is_some();
        if !window_ok {
            return Err(Error::InvalidArrivalWindow {
                min: self.arrival_min_minutes,
                max: self.arrival_max_minutes,
            });
        }
        if !(self.charge_target_percent > 0.0 && self.charge_target_percent <= 100.0) {
            return Err(Error::InvalidChargeTarget(self.charge_target_percent));
        }
        // Arrival level must stay below the target so every session delivers energy.
        let battery_ok = self.battery_min_percent >= 0.0
            && self.battery_min_percent <= self.battery_max_percent
            && self.battery_max_percent < self.charge_target_percent;
        if !battery_ok {
            return Err(Error::InvalidBatteryRange {
                min: self.battery_min_percent,
                max: self.battery_max_percent,
                target: self.charge_target_percent,
            });
        }
        if !(self.battery_capacity_kwh > 0.0) {
            return Err(Error::InvalidBatteryCapacity(self.battery_capacity_kwh));
        }
        if !(self.charging_speed_kw > 0.0) {
            return Err(Error::InvalidChargingSpeed(self.charging_speed_kw));
        }
        if !(self.price_per_kwh >= 0.0) {
            return Err(Error::InvalidPrice(self.price_per_kwh));
        }
        Ok(())
    }
}

pub const MS_PER_MINUTE: u64 = 60_000;
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// A physical charging site.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub last_updated: DateTime<Utc>,
}

/// Charge detail record of one completed session.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Cdr {
    pub id: String,
    pub location_id: String,
    pub vehicle_id: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    /// kWh
    pub total_energy: f64,
    pub total_cost: f64,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = FleetConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.horizon_ms(), 7 * 24 * 3_600_000);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = FleetConfig {
            capacity_per_station: 0,
            ..FleetConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "station capacity must be greater than 0");
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let config = FleetConfig {
            horizon_hours: 0,
            ..FleetConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::HorizonZero)));
    }

    #[test]
    fn empty_station_set_is_rejected() {
        let config = FleetConfig {
            stations: 0,
            ..FleetConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::EmptyStations)));
    }

    #[test]
    fn arrival_window_beyond_millisecond_range_is_rejected() {
        let minutes = u64::MAX / 1000;
        let config = FleetConfig {
            arrival_min_minutes: minutes,
            arrival_max_minutes: minutes,
            ..FleetConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidArrivalWindow { .. })
        ));

        let largest = FleetConfig {
            arrival_min_minutes: u64::MAX / MS_PER_MINUTE,
            arrival_max_minutes: u64::MAX / MS_PER_MINUTE,
            ..FleetConfig::default()
        };
        assert!(largest.validate().is_ok());
    }

    #[test]
    fn inverted_arrival_window_is_rejected() {
        let config = FleetConfig {
            arrival_min_minutes: 30,
            arrival_max_minutes: 10,
            ..FleetConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidArrivalWindow { min: 30, max: 10 })
        ));
    }

    #[test]
    fn battery_range_must_stay_below_target() {
        let config = FleetConfig {
            battery_max_percent: 80.0,
            ..FleetConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidBatteryRange { .. })
        ));
    }

    #[test]
    fn non_positive_charging_speed_is_rejected() {
        let config = FleetConfig {
            charging_speed_kw: 0.0,
            ..FleetConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidChargingSpeed(_))
        ));
    }

    #[test]
    fn nan_price_is_rejected() {
        let config = FleetConfig {
            price_per_kwh: f64::NAN,
            ..FleetConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidPrice(_))));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: FleetConfig =
            serde_json::from_str(r#"{"seed": 7, "start": "2024-05-01T00:00:00Z"}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.vehicles, 20);
        assert_eq!(
            config.origin().to_rfc3339(),
            "2024-05-01T00:00:00+00:00".to_string()
        );
    }

    #[test]
    fn missing_start_maps_to_epoch() {
        assert_eq!(FleetConfig::default().origin(), DateTime::<Utc>::UNIX_EPOCH);
    }
}
