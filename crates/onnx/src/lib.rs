//! Thin binding to the ONNX Runtime C API
//!
//! Everything goes through one process-scoped [`Onnx`] handle, which owns the
//! runtime environment and the resolved function table. Sessions and values
//! keep the handle alive through an `Arc`.

mod onnx;
pub use onnx::*;

pub mod error;
pub mod ffi;
mod f16;
pub mod proto;
pub mod session;
pub mod types;
pub mod value;

pub use error::{OnnxError, Result};
pub use session::Session;
pub use types::{ElementType, ErrorCode, OnnxType, TypeInfo};
pub use value::{TensorElement, Value};
