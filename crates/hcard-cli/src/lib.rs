//! Batch orchestration for Health Card Studio.
//!
//! - **pipeline**: runs raw records through normalize, layout, render, write
//! - **settings**: the TOML settings file
//! - **logging**: tracing subscriber setup and personal-data redaction

pub mod logging;
pub mod pipeline;
pub mod settings;

pub use pipeline::{
    BatchConfig, BatchError, CollisionPolicy, DEFAULT_PROGRESS_EVERY, run_batch,
    run_batch_with_progress,
};
pub use settings::{Settings, SettingsError};
