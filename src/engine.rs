use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::locations::generate_locations;
use crate::models::{Cdr, FleetConfig, Location};
use crate::rng::RandomStream;
use crate::state::{Dataset, RunMetadata};
use crate::station::Station;
use crate::vehicle::{ChargingProfile, CompletedSession, FleetContext, Phase, Vehicle};

/// Minutes between the end of a session and its CDR's `last_updated`.
const CDR_UPDATE_DELAY_MINUTES: i64 = 2;

pub struct SimulationEngine {
    pub config: FleetConfig,
    pub clock: Clock,
    pub rng: RandomStream,
    pub profile: ChargingProfile,
    pub stations: Vec<Station>,
    pub vehicles: Vec<Vehicle>,
    pub sessions: Vec<CompletedSession>,
}

impl SimulationEngine {
    pub fn new(config: FleetConfig) -> Result<Self> {
        config.validate()?;
        let stations = (0..config.stations)
            .map(|id| Station::new(id, config.capacity_per_station))
            .collect();
        let vehicles = (0..config.vehicles).map(Vehicle::new).collect();

        Ok(Self {
            clock: Clock::new(),
            rng: RandomStream::new(config.seed),
            profile: ChargingProfile::from_config(&config),
            stations,
            vehicles,
            sessions: Vec::new(),
            config,
        })
    }

    /// Runs the fleet to the horizon and returns the dated records.
    pub fn run(&mut self) -> Result<Dataset> {
        let origin = self.config.origin();
        let horizon_ms = self.config.horizon_ms();
        let locations = generate_locations(self.config.stations, origin)?;

        info!(
            seed = self.config.seed,
            vehicles = self.vehicles.len(),
            stations = self.stations.len(),
            horizon_ms,
            "starting fleet simulation"
        );

        for vehicle in self.vehicles.iter_mut() {
            let mut ctx = FleetContext {
                clock: &mut self.clock,
                rng: &mut self.rng,
                stations: &mut self.stations,
                profile: &self.profile,
                sessions: &mut self.sessions,
            };
            vehicle.start(&mut ctx)?;
        }

        let events_processed = self.clock.run_until(horizon_ms, |clock, event| {
            let mut ctx = FleetContext {
                clock,
                rng: &mut self.rng,
                stations: &mut self.stations,
                profile: &self.profile,
                sessions: &mut self.sessions,
            };
            self.vehicles[event.vehicle()].resume(event, &mut ctx)
        })?;

        let abandoned_sessions = self.abandon_in_flight()?;

        let cdrs = self
            .sessions
            .iter()
            .enumerate()
            .map(|(idx, session)| self.to_cdr(idx, session, &locations, origin))
            .collect::<Result<Vec<_>>>()?;

        info!(
            events_processed,
            sessions = cdrs.len(),
            abandoned_sessions,
            "fleet simulation finished"
        );

        Ok(Dataset {
            metadata: RunMetadata {
                seed: self.config.seed,
                vehicles: self.config.vehicles,
                stations: self.config.stations,
                capacity_per_station: self.config.capacity_per_station,
                horizon_hours: self.config.horizon_hours,
                start: origin,
                events_processed,
                abandoned_sessions,
            },
            locations,
            cdrs,
        })
    }

    /// Gives back every slot held when the clock stopped and drops the wait
    /// lists, so each station ends the run empty.
    fn abandon_in_flight(&mut self) -> Result<usize> {
        let mut held = vec![0u32; self.stations.len()];
        for station in self.vehicles.iter().filter_map(Vehicle::held_station) {
            held[station] += 1;
        }
        let mut abandoned = 0;
        for (station, held) in self.stations.iter_mut().zip(held) {
            abandoned += station.abandon(held)?;
        }
        Ok(abandoned)
    }

    fn to_cdr(
        &self,
        idx: usize,
        session: &CompletedSession,
        locations: &[Location],
        origin: DateTime<Utc>,
    ) -> Result<Cdr> {
        let start_date_time = at(origin, session.started_at_ms)?;
        let end_date_time = at(origin, session.ended_at_ms)?;
        let last_updated = end_date_time
            .checked_add_signed(Duration::minutes(CDR_UPDATE_DELAY_MINUTES))
            .ok_or(Error::TimeOverflow(session.ended_at_ms))?;

        Ok(Cdr {
            id: format!("CDR-{:06}", idx + 1),
            location_id: locations[session.station].id.clone(),
            vehicle_id: self.vehicles[session.vehicle].id.clone(),
            start_date_time,
            end_date_time,
            total_energy: session.energy_kwh,
            total_cost: session.cost,
            last_updated,
        })
    }

    pub fn vehicle_phases(&self) -> Vec<Phase> {
        self.vehicles.iter().map(Vehicle::phase).collect()
    }
}

fn at(origin: DateTime<Utc>, time_ms: u64) -> Result<DateTime<Utc>> {
    i64::try_from(time_ms)
        .ok()
        .and_then(Duration::try_milliseconds)
        .and_then(|offset| origin.checked_add_signed(offset))
        .ok_or(Error::TimeOverflow(time_ms))
}

/// Seeds the dataset: one deterministic run of the fleet over the horizon.
pub fn generate(config: &FleetConfig) -> Result<Dataset> {
    let mut engine = SimulationEngine::new(config.clone())?;
    engine.run()
}
