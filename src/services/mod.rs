//! Business logic services.

pub mod audit_service;
pub mod auth_service;
pub mod proxy_service;
pub mod user_service;
pub mod venue_service;
