// src/pipeline/mod.rs

//! The canonical six-stage content pipeline.
//!
//! ```text
//! planning -> research -> writing -+-> editing -+-> formatting
//!                                  +-> seo -----+
//! ```
//!
//! `editing` and `seo` only depend on `writing`, so they run in the same
//! level; `formatting` waits for both.

pub mod builder;
pub mod stage;

pub use builder::build_standard_pipeline;
pub use stage::StageName;
