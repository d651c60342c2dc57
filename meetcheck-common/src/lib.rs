//! # meetcheck common library
//!
//! Shared code for the meetcheck tools:
//! - Error type used across crates
//! - Rule-set and dotfile configuration loading
//! - Path resolution against the known working directories
//! - Human-readable swim time formatting

pub mod config;
pub mod error;
pub mod human_time;

pub use error::{Error, Result};
