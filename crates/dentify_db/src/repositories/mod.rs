//! Repositories for the Dentify database layer

pub mod appointment;
pub mod appointment_memory;
pub mod appointment_sql;

pub use appointment::{
    from_db_time, to_db_time, AppointmentRepository, CreateOutcome,
};
pub use appointment_memory::InMemoryAppointmentRepository;
pub use appointment_sql::SqlAppointmentRepository;
