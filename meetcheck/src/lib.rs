//! meetcheck - swim meet results anomaly checker
//!
//! Pulls the results tables out of a Meet Manager database, runs a
//! configurable set of checks over every swim (missing pad touches, averaged
//! times, new qualifying times and records, suspicious drops) and writes an
//! HTML report grouping the flagged swims by event, heat and lane.
//!
//! Pipeline: [`source`] → [`model`] → [`runner`] (via [`registry`] and
//! [`checkers`]) → [`accumulator`] → [`report`]. [`pipeline`] strings these
//! together; [`daemon`] repeats it on a timer.

pub mod accumulator;
pub mod checkers;
pub mod color_wheel;
pub mod compare;
pub mod daemon;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod runner;
pub mod source;

pub use error::{CheckError, Error, Result};
