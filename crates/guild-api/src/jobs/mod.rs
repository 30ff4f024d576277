//! Background jobs run alongside the HTTP server

pub mod sweep;

pub use sweep::spawn_sweep;
