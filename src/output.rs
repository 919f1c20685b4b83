use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::Result;
use crate::models::FleetConfig;
use crate::state::Dataset;

pub trait Formatter {
    fn write(&self, dataset: &Dataset) -> Result<String>;
}

pub struct HumanFormatter;
pub struct SummaryFormatter;
pub struct JsonFormatter;

impl Formatter for HumanFormatter {
    fn write(&self, dataset: &Dataset) -> Result<String> {
        let mut out = String::new();
        write_metadata(&mut out, dataset);

        out.push_str("Locations:\n");
        for location in &dataset.locations {
            let _ = write!(out, "- {}: {}, {}", location.id, location.name, location.address);
            if let Some(city) = &location.city {
                let _ = write!(out, ", {}", city);
            }
            if let Some(country) = &location.country {
                let _ = write!(out, ", {}", country);
            }
            out.push('\n');
        }

        out.push_str("Sessions:\n");
        for cdr in &dataset.cdrs {
            let _ = writeln!(
                out,
                "{} {} @ {}: {} -> {} ({:.3} kWh, {:.2})",
                cdr.id,
                cdr.vehicle_id,
                cdr.location_id,
                timestamp(&cdr.start_date_time),
                timestamp(&cdr.end_date_time),
                cdr.total_energy,
                cdr.total_cost
            );
        }

        write_summary(&mut out, dataset);
        Ok(out)
    }
}

impl Formatter for SummaryFormatter {
    fn write(&self, dataset: &Dataset) -> Result<String> {
        let mut out = String::new();
        write_metadata(&mut out, dataset);
        write_summary(&mut out, dataset);
        Ok(out)
    }
}

impl Formatter for JsonFormatter {
    fn write(&self, dataset: &Dataset) -> Result<String> {
        let mut out = serde_json::to_string_pretty(dataset)?;
        out.push('\n');
        Ok(out)
    }
}

fn write_metadata(out: &mut String, dataset: &Dataset) {
    let metadata = &dataset.metadata;
    out.push_str("Metadata:\n");
    let _ = writeln!(out, "seed: {}", metadata.seed);
    let _ = writeln!(out, "start: {}", timestamp(&metadata.start));
    let _ = writeln!(out, "horizon_hours: {}", metadata.horizon_hours);
    let _ = writeln!(out, "events_processed: {}", metadata.events_processed);
    let _ = writeln!(out, "abandoned_sessions: {}", metadata.abandoned_sessions);
}

fn write_summary(out: &mut String, dataset: &Dataset) {
    out.push_str("Summary:\n");
    for summary in dataset.location_summaries() {
        let _ = writeln!(
            out,
            "{}: {} sessions ({:.3} kWh, revenue {:.2})",
            summary.location_id, summary.sessions, summary.energy_kwh, summary.revenue
        );
    }
}

pub fn describe_config(config: &FleetConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Seed: {}", config.seed);
    let _ = writeln!(out, "Vehicles: {}", config.vehicles);
    let _ = writeln!(
        out,
        "Stations: {} (capacity {})",
        config.stations, config.capacity_per_station
    );
    let _ = writeln!(out, "Horizon: {}h", config.horizon_hours);
    let _ = writeln!(out, "Start: {}", timestamp(&config.origin()));
    let _ = writeln!(
        out,
        "Arrival window: {}-{} min",
        config.arrival_min_minutes, config.arrival_max_minutes
    );
    let _ = writeln!(
        out,
        "Battery on arrival: {}-{}% (charge to {}%)",
        config.battery_min_percent, config.battery_max_percent, config.charge_target_percent
    );
    let _ = writeln!(out, "Battery capacity: {} kWh", config.battery_capacity_kwh);
    let _ = writeln!(out, "Charging speed: {} kW", config.charging_speed_kw);
    let _ = writeln!(out, "Price per kWh: {}", config.price_per_kwh);
    out
}

fn timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::generate;

    fn config() -> FleetConfig {
        FleetConfig {
            seed: 7,
            vehicles: 1,
            stations: 1,
            capacity_per_station: 1,
            horizon_hours: 2,
            arrival_min_minutes: 30,
            arrival_max_minutes: 30,
            battery_min_percent: 10.0,
            battery_max_percent: 10.0,
            start: Some("2024-05-01T00:00:00Z".parse().unwrap()),
            ..FleetConfig::default()
        }
    }

    #[test]
    fn human_output_lists_everything() {
        let dataset = generate(&config()).unwrap();
        let expected = concat!(
            "Metadata:\n",
            "seed: 7\n",
            "start: 2024-05-01T00:00:00Z\n",
            "horizon_hours: 2\n",
            "events_processed: 2\n",
            "abandoned_sessions: 0\n",
            "Locations:\n",
            "- ACME-LOC-001: ACME Fleet Charging - Amsterdam, Piet Heinkade 55, Amsterdam, NL\n",
            "Sessions:\n",
            "CDR-000001 ACME-FLEET-000 @ ACME-LOC-001: 2024-05-01T00:30:00Z -> 2024-05-01T01:33:00Z (52.500 kWh, 18.38)\n",
            "Summary:\n",
            "ACME-LOC-001: 1 sessions (52.500 kWh, revenue 18.38)\n",
        );
        assert_eq!(HumanFormatter.write(&dataset).unwrap(), expected);
    }

    #[test]
    fn summary_output_skips_records() {
        let dataset = generate(&config()).unwrap();
        let output = SummaryFormatter.write(&dataset).unwrap();
        assert!(output.starts_with("Metadata:\nseed: 7\n"));
        assert!(!output.contains("Sessions:"));
        assert!(output.ends_with("Summary:\nACME-LOC-001: 1 sessions (52.500 kWh, revenue 18.38)\n"));
    }

    #[test]
    fn json_output_round_trips_the_dataset() {
        let dataset = generate(&config()).unwrap();
        let output = JsonFormatter.write(&dataset).unwrap();
        let parsed: Dataset = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, dataset);
        assert!(output.contains("\"start_date_time\": \"2024-05-01T00:30:00Z\""));
    }

    #[test]
    fn describes_resolved_config() {
        let expected = concat!(
            "Seed: 7\n",
            "Vehicles: 1\n",
            "Stations: 1 (capacity 1)\n",
            "Horizon: 2h\n",
            "Start: 2024-05-01T00:00:00Z\n",
            "Arrival window: 30-30 min\n",
            "Battery on arrival: 10-10% (charge to 80%)\n",
            "Battery capacity: 75 kWh\n",
            "Charging speed: 50 kW\n",
            "Price per kWh: 0.35\n",
        );
        assert_eq!(describe_config(&config()), expected);
    }
}
