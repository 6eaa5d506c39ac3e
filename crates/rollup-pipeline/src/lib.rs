//! Dataset pipelines as data.
//!
//! A [`PipelineConfig`] names a primary input, an optional reference input and an ordered list of
//! [`Step`]s. The runner reads the inputs with `rollup-io`, folds the steps over the primary table
//! with `rollup-sql`, and saves the result as a versioned file.

#![forbid(unsafe_code)]

pub mod cli;
mod config;
mod presets;
mod runner;

pub use crate::config::{Inputs, PipelineConfig, Step};
pub use crate::presets::{hospital, marketplace, Preset};
pub use crate::runner::{extract, extract_and_transform, run, transform, Sources};
