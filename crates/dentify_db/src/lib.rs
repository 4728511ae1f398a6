//! Database integration for Dentify
//!
//! This crate provides a database client that is designed to be database agnostic,
//! using SQLx as the underlying database library, plus the appointment repository
//! the booking service persists through. SQLite is the default backend; PostgreSQL
//! is available behind the `postgres` feature.

pub mod client;
pub mod error;
pub mod repositories;

pub use client::DbClient;
pub use error::DbError;
pub use repositories::{
    AppointmentRepository, CreateOutcome, InMemoryAppointmentRepository, SqlAppointmentRepository,
};
