//! Orientation tuning-curve analysis.
//!
//! Load per-unit control/laser responses, narrow them down with
//! [`data::filter`], aggregate with [`analysis::summary`], reshape curves
//! with [`analysis::matrix`] and label laser modulation with
//! [`analysis::classify`].

pub mod analysis;
pub mod data;
pub mod error;

pub use error::{Result, TuningError};
