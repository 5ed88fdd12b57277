//! Community smart-home battery dispatch simulator.
//!
//! A run builds a community of households from daily demand and PV
//! profiles, aggregates what they cannot cover themselves, and schedules a
//! single shared battery against grid prices by solving a mixed-integer
//! program over one day of hourly periods.

pub mod community;
pub mod config;
/// Dispatch model construction and the solver seam.
pub mod dispatch;
pub mod error;
pub mod household;
pub mod prices;
pub mod profile;
pub mod report;
pub mod runner;
pub mod series;
