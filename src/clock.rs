//! Virtual clock and pending wake-ups.
//!
//! Time is an integer number of milliseconds since the simulation origin and
//! only moves when an event is popped. Events sharing a timestamp come out in
//! the order they were scheduled.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::trace;

use crate::error::{Error, Result};
use crate::events::{Event, ScheduledEvent};

#[derive(Debug, Default)]
pub struct Clock {
    now_ms: u64,
    next_seq: u64,
    queue: BinaryHeap<Reverse<ScheduledEvent>>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn schedule(&mut self, at_ms: u64, event: Event) -> Result<()> {
        if at_ms < self.now_ms {
            return Err(Error::ScheduleInPast {
                at_ms,
                now_ms: self.now_ms,
            });
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue
            .push(Reverse(ScheduledEvent::new(at_ms, seq, event)));
        Ok(())
    }

    pub fn schedule_in(&mut self, delay_ms: u64, event: Event) -> Result<()> {
        let at_ms = self
            .now_ms
            .checked_add(delay_ms)
            .ok_or(Error::TimeOverflow(delay_ms))?;
        self.schedule(at_ms, event)
    }

    /// Drains events strictly before `horizon_ms`, handing each one to
    /// `resume`. An event at exactly the horizon is left in the queue.
    ///
    /// Returns the number of events processed.
    pub fn run_until<F>(&mut self, horizon_ms: u64, mut resume: F) -> Result<u64>
    where
        F: FnMut(&mut Clock, Event) -> Result<()>,
    {
        let mut processed = 0u64;
        while let Some(Reverse(next)) = self.queue.peek() {
            if next.time_ms >= horizon_ms {
                break;
            }
            let Some(Reverse(scheduled)) = self.queue.pop() else {
                break;
            };
            self.now_ms = scheduled.time_ms;
            trace!(
                time_ms = scheduled.time_ms,
                seq = scheduled.seq,
                kind = scheduled.event.label(),
                vehicle = scheduled.event.vehicle(),
                "resume"
            );
            resume(self, scheduled.event)?;
            processed += 1;
        }
        Ok(processed)
    }
}
