use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("stations must not be empty")]
    EmptyStations,
    #[error("station capacity must be greater than 0")]
    CapacityZero,
    #[error("horizon must be greater than 0")]
    HorizonZero,
    #[error("arrival window must satisfy min <= max and max > 0, in range of a millisecond clock (got {min}..{max} minutes)")]
    InvalidArrivalWindow { min: u64, max: u64 },
    #[error("battery level range must satisfy 0 <= min <= max < charge target {target}% (got {min}..{max}%)")]
    InvalidBatteryRange { min: f64, max: f64, target: f64 },
    #[error("charge target must be within (0, 100]% (got {0}%)")]
    InvalidChargeTarget(f64),
    #[error("charging speed must be > 0 (got {0}kW)")]
    InvalidChargingSpeed(f64),
    #[error("battery capacity must be > 0 (got {0}kWh)")]
    InvalidBatteryCapacity(f64),
    #[error("price per kWh must not be negative (got {0})")]
    InvalidPrice(f64),
    #[error("invalid start timestamp '{0}': expected RFC 3339")]
    InvalidStart(String),
    #[error("{0}")]
    ConfigIo(String),
    #[error("{0}")]
    ConfigParse(String),
    #[error("unsupported config format '{0}'")]
    UnsupportedConfigFormat(String),
    #[error("{0}")]
    Cli(String),
    #[error("cannot schedule event at {at_ms}ms before current time {now_ms}ms")]
    ScheduleInPast { at_ms: u64, now_ms: u64 },
    #[error("station {station} exceeded its capacity of {capacity}")]
    CapacityExceeded { station: usize, capacity: u32 },
    #[error("station {0} released with no slot in use")]
    ReleaseIdle(usize),
    #[error("vehicle {vehicle} woke up by {wake} while {phase}")]
    UnexpectedWake {
        vehicle: usize,
        wake: &'static str,
        phase: &'static str,
    },
    #[error("station {station} still has {in_use} slot(s) in use after shutdown")]
    SlotLeak { station: usize, in_use: u32 },
    #[error("virtual time {0}ms does not fit the calendar")]
    TimeOverflow(u64),
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
