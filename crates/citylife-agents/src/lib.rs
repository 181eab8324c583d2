//! Agents for the CityLife simulation: persons, businesses, and the
//! employment office.
//!
//! The [`Person`] commute state machine consumes clock ticks and the
//! transport network to move between home and work. [`Business`] holds
//! the employee roster and runs the punctuality and payroll rules;
//! [`EmploymentOffice`] is the FIFO pool of unemployed persons the
//! businesses hire from.
//!
//! # Modules
//!
//! - [`error`] -- Error types for agent operations.
//! - [`person`] -- The per-person commute state machine.
//! - [`business`] -- Business kinds, rosters, delay checks, and pay.
//! - [`employment`] -- The unemployed pool.

pub mod business;
pub mod employment;
pub mod error;
pub mod person;

// Re-export primary types at crate root.
pub use business::{Business, BusinessKind, Employee, MAX_DELAYS};
pub use employment::EmploymentOffice;
pub use error::AgentError;
pub use person::{CommuteEvent, Person, WORK_JITTER};
