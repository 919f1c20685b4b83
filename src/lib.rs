pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod locations;
pub mod models;
pub mod output;
pub mod rng;
pub mod state;
pub mod station;
pub mod vehicle;
