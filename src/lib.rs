//! Parcel pricing, transit-time estimates and booking ledger for FWEN
//! bus-parcel deliveries.

pub mod cli;
pub mod config;
pub mod database;
pub mod distance;
pub mod domain;
pub mod error;
pub mod pricing;
pub mod setup;
pub mod tracking;

pub use domain::types::{PriorityClass, Quote, ShipmentRequest, SizeClass};
pub use pricing::CostEstimator;
