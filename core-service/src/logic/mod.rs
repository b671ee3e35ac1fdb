//! Detection logic: features, model, history and the pipeline tying them together.

pub mod config;
pub mod detector;
pub mod features;
pub mod history;
pub mod model;
