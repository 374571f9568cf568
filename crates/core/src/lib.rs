//! # SlotBook Core
//!
//! Domain types shared by the database and API crates: forms, slots,
//! applicants, booking requests, the error taxonomy and the slot generator.
//! Nothing in this crate performs I/O.

pub mod errors;
pub mod models;
pub mod slot_generator;
pub mod time_format;
