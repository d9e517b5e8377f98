//! Lead qualification: weighted scoring of sales prospects and the workflow around it.

pub mod config;
pub mod error;
pub mod qualification;
pub mod telemetry;
