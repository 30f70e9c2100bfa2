//! Synthetic student-population simulator producing IPEDS-shaped records.
//!
//! The engine runs entirely in memory and deterministically from a seed;
//! `store` persists a finished run to SQLite in one transaction.

pub mod calendar;
pub mod catalog;
pub mod cohort;
pub mod config;
pub mod demographics;
pub mod engine;
pub mod error;
pub mod grades;
pub mod name_generator;
pub mod records;
pub mod retention;
pub mod rng;
pub mod sampler;
pub mod store;
pub mod types;
pub mod validate;

pub use config::SimConfig;
pub use engine::SimEngine;
pub use error::{SimError, SimResult};
pub use records::SimOutput;
pub use store::SimStore;
