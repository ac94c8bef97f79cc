pub mod appointment;
pub mod doctor;
pub mod error;
pub mod patient;

pub use appointment::{Appointment, NewAppointment};
pub use doctor::{Doctor, NewDoctor};
pub use error::AppError;
pub use patient::{NewPatient, Patient};
