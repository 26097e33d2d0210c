//! Domain models.

pub mod application;
pub mod audit;
pub mod gig;
pub mod user;
