//! CareGate Core — shared domain models, the error taxonomy, and the
//! repository trait that decouples the auth layer from the database
//! crate.

pub mod error;
pub mod models;
pub mod repository;
