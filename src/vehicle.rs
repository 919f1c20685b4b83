//! Vehicle charging process.
//!
//! Each vehicle is an explicit state machine. It suspends while waiting for a
//! timer (arrival or end of charge) or for a station grant, and the engine
//! resumes it with the event that woke it up:
//!
//! ```text
//! AwaitingArrival -> RequestingStation -> Charging -> Releasing -> AwaitingArrival
//! ```

use tracing::debug;

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::events::Event;
use crate::models::{FleetConfig, MS_PER_HOUR, MS_PER_MINUTE};
use crate::rng::RandomStream;
use crate::station::{Request, Station};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    /// Created, not started yet.
    Parked,
    AwaitingArrival,
    RequestingStation {
        station: usize,
    },
    Charging {
        station: usize,
        started_at_ms: u64,
        energy_kwh: f64,
    },
    Releasing {
        station: usize,
        started_at_ms: u64,
        energy_kwh: f64,
    },
}

impl Phase {
    fn label(&self) -> &'static str {
        match self {
            Phase::Parked => "parked",
            Phase::AwaitingArrival => "awaiting arrival",
            Phase::RequestingStation { .. } => "requesting a station",
            Phase::Charging { .. } => "charging",
            Phase::Releasing { .. } => "releasing",
        }
    }
}

/// Charging behaviour shared by the whole fleet, in virtual-time units.
#[derive(Clone, Debug, PartialEq)]
pub struct ChargingProfile {
    pub arrival_min_ms: u64,
    pub arrival_max_ms: u64,
    pub battery_min_percent: f64,
    pub battery_max_percent: f64,
    pub charge_target_percent: f64,
    pub battery_capacity_kwh: f64,
    pub charging_speed_kw: f64,
    pub price_per_kwh: f64,
}

impl ChargingProfile {
    pub fn from_config(config: &FleetConfig) -> Self {
        Self {
            arrival_min_ms: config.arrival_min_minutes.saturating_mul(MS_PER_MINUTE),
            arrival_max_ms: config.arrival_max_minutes.saturating_mul(MS_PER_MINUTE),
            battery_min_percent: config.battery_min_percent,
            battery_max_percent: config.battery_max_percent,
            charge_target_percent: config.charge_target_percent,
            battery_capacity_kwh: config.battery_capacity_kwh,
            charging_speed_kw: config.charging_speed_kw,
            price_per_kwh: config.price_per_kwh,
        }
    }

    pub fn energy_needed_kwh(&self, arrival_percent: f64) -> f64 {
        self.battery_capacity_kwh * (self.charge_target_percent - arrival_percent) / 100.0
    }

    /// Charge time rounded to the millisecond, never shorter than 1ms so a
    /// session always ends after it starts.
    pub fn charge_duration_ms(&self, energy_kwh: f64) -> u64 {
        let ms = (energy_kwh * MS_PER_HOUR as f64 / self.charging_speed_kw).round();
        (ms as u64).max(1)
    }

    pub fn cost(&self, energy_kwh: f64) -> f64 {
        energy_kwh * self.price_per_kwh
    }
}

/// A finished session in virtual time, before it is dated and numbered.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletedSession {
    pub vehicle: usize,
    pub station: usize,
    pub started_at_ms: u64,
    pub ended_at_ms: u64,
    pub energy_kwh: f64,
    pub cost: f64,
}

/// Everything a vehicle touches while it runs one step.
pub struct FleetContext<'a> {
    pub clock: &'a mut Clock,
    pub rng: &'a mut RandomStream,
    pub stations: &'a mut [Station],
    pub profile: &'a ChargingProfile,
    pub sessions: &'a mut Vec<CompletedSession>,
}

#[derive(Clone, Debug)]
pub struct Vehicle {
    pub index: usize,
    pub id: String,
    phase: Phase,
}

impl Vehicle {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            id: format!("ACME-FLEET-{:03}", index),
            phase: Phase::Parked,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Station slot this vehicle occupies, if any.
    pub fn held_station(&self) -> Option<usize> {
        match self.phase {
            Phase::Charging { station, .. } | Phase::Releasing { station, .. } => Some(station),
            _ => None,
        }
    }

    pub fn start(&mut self, ctx: &mut FleetContext) -> Result<()> {
        match self.phase {
            Phase::Parked => self.await_arrival(ctx),
            phase => Err(self.unexpected("start", phase)),
        }
    }

    pub fn resume(&mut self, event: Event, ctx: &mut FleetContext) -> Result<()> {
        match (self.phase, event) {
            (Phase::AwaitingArrival, Event::Timer { .. }) => {
                let station = ctx.rng.next_index(ctx.stations.len());
                self.phase = Phase::RequestingStation { station };
                match ctx.stations[station].request(self.index)? {
                    Request::Granted => self.begin_charging(station, ctx),
                    Request::Queued { position } => {
                        debug!(
                            vehicle = %self.id,
                            station,
                            position,
                            time_ms = ctx.clock.now_ms(),
                            "station full, queued"
                        );
                        Ok(())
                    }
                }
            }
            (Phase::RequestingStation { station }, Event::Grant { station: granted, .. })
                if station == granted =>
            {
                self.begin_charging(station, ctx)
            }
            (
                Phase::Charging {
                    station,
                    started_at_ms,
                    energy_kwh,
                },
                Event::Timer { .. },
            ) => {
                self.phase = Phase::Releasing {
                    station,
                    started_at_ms,
                    energy_kwh,
                };
                self.finish_session(ctx)
            }
            (phase, event) => Err(self.unexpected(event.label(), phase)),
        }
    }

    fn await_arrival(&mut self, ctx: &mut FleetContext) -> Result<()> {
        let delay_ms = ctx
            .rng
            .next_interval(ctx.profile.arrival_min_ms, ctx.profile.arrival_max_ms);
        self.phase = Phase::AwaitingArrival;
        ctx.clock.schedule_in(
            delay_ms,
            Event::Timer {
                vehicle: self.index,
            },
        )
    }

    fn begin_charging(&mut self, station: usize, ctx: &mut FleetContext) -> Result<()> {
        let started_at_ms = ctx.clock.now_ms();
        let arrival_percent = ctx.rng.next_value(
            ctx.profile.battery_min_percent,
            ctx.profile.battery_max_percent,
        );
        let energy_kwh = ctx.profile.energy_needed_kwh(arrival_percent);
        self.phase = Phase::Charging {
            station,
            started_at_ms,
            energy_kwh,
        };
        ctx.clock.schedule_in(
            ctx.profile.charge_duration_ms(energy_kwh),
            Event::Timer {
                vehicle: self.index,
            },
        )
    }

    fn finish_session(&mut self, ctx: &mut FleetContext) -> Result<()> {
        let Phase::Releasing {
            station,
            started_at_ms,
            energy_kwh,
        } = self.phase
        else {
            return Err(self.unexpected("release", self.phase));
        };

        let ended_at_ms = ctx.clock.now_ms();
        ctx.stations[station].release(ctx.clock)?;
        let session = CompletedSession {
            vehicle: self.index,
            station,
            started_at_ms,
            ended_at_ms,
            energy_kwh,
            cost: ctx.profile.cost(energy_kwh),
        };
        debug!(
            vehicle = %self.id,
            station,
            started_at_ms,
            ended_at_ms,
            energy_kwh,
            "session complete"
        );
        ctx.sessions.push(session);

        self.await_arrival(ctx)
    }

    fn unexpected(&self, wake: &'static str, phase: Phase) -> Error {
        Error::UnexpectedWake {
            vehicle: self.index,
            wake,
            phase: phase.label(),
        }
    }
}
