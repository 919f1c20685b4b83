use std::cmp::Ordering;

/// Continuation carried by a scheduled wake-up: which vehicle process to
/// resume and why.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Event {
    Timer { vehicle: usize },
    Grant { vehicle: usize, station: usize },
}

impl Event {
    pub fn vehicle(&self) -> usize {
        match self {
            Event::Timer { vehicle } | Event::Grant { vehicle, .. } => *vehicle,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Event::Timer { .. } => "timer",
            Event::Grant { .. } => "grant",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScheduledEvent {
    pub time_ms: u64,
    pub seq: u64,
    pub event: Event,
}

impl ScheduledEvent {
    pub fn new(time_ms: u64, seq: u64, event: Event) -> Self {
        Self {
            time_ms,
            seq,
            event,
        }
    }
}

// Earliest time first, then earliest insertion.
impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time_ms
            .cmp(&other.time_ms)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
