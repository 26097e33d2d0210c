//! Morphema - Backend Library
//!
//! Demo gig-marketplace backend connecting venues and occasional workers
//! under the Italian autonomous-work contract model.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod telemetry;

pub use config::Config;
pub use error::{AppError, Result};
