//! Domain data types for the pitch pipeline.

pub mod cadence;
pub mod config;
pub mod objection;
pub mod pitch;
pub mod product;
