//! Fuzz prediction harness around ONNX Runtime
//!
//! One cycle: build a [`PredictionSession`] from a [`ModelSource`], fill every
//! tensor input through an [`InputGenerator`] ([`RandomInputs`] by default), run
//! inference once and render the outputs as text for triage.

mod config;
pub use config::*;

mod error;
pub use error::*;

pub mod generate;
pub use generate::{InputGenerator, RandomInputs, generate};

pub mod render;

mod session;
pub use session::*;

mod setup;
pub use setup::*;

mod source;
pub use source::*;

mod tensor;
pub use tensor::*;
