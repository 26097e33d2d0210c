//! HTTP handlers.

pub mod admin;
pub mod applications;
pub mod audit;
pub mod gigs;
pub mod health;
pub mod proxy;
pub mod uploads;
pub mod venue;
