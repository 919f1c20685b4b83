use std::collections::VecDeque;

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::events::Event;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Request {
    Granted,
    Queued { position: usize },
}

/// Charging slots of one location, handed out first come first served.
#[derive(Clone, Debug)]
pub struct Station {
    pub id: usize,
    capacity: u32,
    in_use: u32,
    waiters: VecDeque<usize>,
}

impl Station {
    pub fn new(id: usize, capacity: u32) -> Self {
        Self {
            id,
            capacity,
            in_use: 0,
            waiters: VecDeque::new(),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn in_use(&self) -> u32 {
        self.in_use
    }

    pub fn waiting(&self) -> usize {
        self.waiters.len()
    }

    pub fn request(&mut self, vehicle: usize) -> Result<Request> {
        if self.in_use < self.capacity {
            self.occupy()?;
            return Ok(Request::Granted);
        }
        self.waiters.push_back(vehicle);
        Ok(Request::Queued {
            position: self.waiters.len(),
        })
    }

    /// Frees one slot. The longest waiter, if any, takes it over at the
    /// current time through a zero-delay grant.
    pub fn release(&mut self, clock: &mut Clock) -> Result<()> {
        self.vacate()?;
        if let Some(vehicle) = self.waiters.pop_front() {
            self.occupy()?;
            clock.schedule_in(
                0,
                Event::Grant {
                    vehicle,
                    station: self.id,
                },
            )?;
        }
        Ok(())
    }

    /// Shuts the station down at the horizon: gives back the `held` slots of
    /// vehicles still charging and drops every queued request. Nobody is woken
    /// up since the clock has stopped.
    ///
    /// Returns how many sessions were cut off. A slot still in use afterwards
    /// means a holder went unaccounted for.
    pub fn abandon(&mut self, held: u32) -> Result<usize> {
        for _ in 0..held {
            self.vacate()?;
        }
        if self.in_use > 0 {
            return Err(Error::SlotLeak {
                station: self.id,
                in_use: self.in_use,
            });
        }
        let waiting = self.waiters.len();
        self.waiters.clear();
        Ok(held as usize + waiting)
    }

    fn occupy(&mut self) -> Result<()> {
        if self.in_use >= self.capacity {
            return Err(Error::CapacityExceeded {
                station: self.id,
                capacity: self.capacity,
            });
        }
        self.in_use += 1;
        Ok(())
    }

    fn vacate(&mut self) -> Result<()> {
        if self.in_use == 0 {
            return Err(Error::ReleaseIdle(self.id));
        }
        self.in_use -= 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grants_until_capacity_then_queues() {
        let mut station = Station::new(0, 2);
        assert_eq!(station.request(10).unwrap(), Request::Granted);
        assert_eq!(station.request(11).unwrap(), Request::Granted);
        assert_eq!(
            station.request(12).unwrap(),
            Request::Queued { position: 1 }
        );
        assert_eq!(
            station.request(13).unwrap(),
            Request::Queued { position: 2 }
        );
        assert_eq!(station.in_use(), station.capacity());
        assert_eq!(station.waiting(), 2);
    }

    #[test]
    fn release_hands_slot_to_earliest_waiter() {
        let mut clock = Clock::new();
        let mut station = Station::new(3, 1);
        station.request(0).unwrap();
        station.request(1).unwrap();
        station.request(2).unwrap();

        station.release(&mut clock).unwrap();
        assert_eq!(station.in_use(), 1);
        assert_eq!(station.waiting(), 1);

        let mut granted = Vec::new();
        clock
            .run_until(1, |clock, event| {
                granted.push((clock.now_ms(), event));
                Ok(())
            })
            .unwrap();
        assert_eq!(
            granted,
            vec![(
                0,
                Event::Grant {
                    vehicle: 1,
                    station: 3
                }
            )]
        );
    }

    #[test]
    fn release_without_waiters_frees_slot() {
        let mut clock = Clock::new();
        let mut station = Station::new(0, 1);
        station.request(0).unwrap();
        station.release(&mut clock).unwrap();
        assert_eq!(station.in_use(), 0);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn releasing_idle_station_is_an_invariant_violation() {
        let mut clock = Clock::new();
        let mut station = Station::new(4, 1);
        assert!(matches!(
            station.release(&mut clock),
            Err(Error::ReleaseIdle(4))
        ));
    }

    #[test]
    fn abandonment_frees_slots_and_waiters() {
        let mut station = Station::new(0, 2);
        station.request(0).unwrap();
        station.request(1).unwrap();
        station.request(2).unwrap();
        assert_eq!(station.abandon(2).unwrap(), 3);
        assert_eq!(station.in_use(), 0);
        assert_eq!(station.waiting(), 0);
        assert_eq!(station.capacity(), 2);
    }

    #[test]
    fn abandonment_detects_unaccounted_slots() {
        let mut station = Station::new(5, 2);
        station.request(0).unwrap();
        station.request(1).unwrap();
        assert!(matches!(
            station.abandon(1),
            Err(Error::SlotLeak {
                station: 5,
                in_use: 1
            })
        ));
    }

    #[test]
    fn abandoning_more_slots_than_held_is_rejected() {
        let mut station = Station::new(6, 1);
        assert!(matches!(station.abandon(1), Err(Error::ReleaseIdle(6))));
    }
}
