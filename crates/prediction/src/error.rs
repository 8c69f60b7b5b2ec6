use {
    crate::MAX_ELEMENTS,
    onnx::{ElementType, OnnxError, OnnxType},
    std::fmt,
};

#[derive(Debug)]
pub enum PredictionError {
    /// The engine rejected the model (missing file, malformed or mismatched bytes, invalid graph)
    Load(OnnxError),
    /// A model description could not be turned into bytes
    Serialization(String),
    /// No random data generator for this element type
    UnsupportedType(ElementType),
    /// Input is not a dense tensor; skipped during setup
    UnsupportedInputKind { index: usize, kind: OnnxType },
    /// The engine's run call failed, carried unchanged
    Inference(OnnxError),
    /// Introspection or tensor construction failed
    Engine(OnnxError),
    InputIndex { index: usize, count: usize },
    /// Declared shape is too large to generate data for
    TooManyElements { shape: Vec<usize> },
    Render(fmt::Error),
    Config(String),
}

impl fmt::Display for PredictionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionError::Load(err) => write!(f, "load error: {err}"),
            PredictionError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            PredictionError::UnsupportedType(element_type) => {
                write!(f, "only floats/ints are implemented (got {element_type})")
            }
            PredictionError::UnsupportedInputKind { index, kind } => {
                write!(f, "input {index} is not a dense tensor ({kind})")
            }
            PredictionError::Inference(err) => write!(f, "inference error: {err}"),
            PredictionError::Engine(err) => write!(f, "engine error: {err}"),
            PredictionError::InputIndex { index, count } => {
                write!(f, "input index {index} out of range ({count} inputs)")
            }
            PredictionError::TooManyElements { shape } => {
                write!(f, "tensor shape {shape:?} exceeds {MAX_ELEMENTS} elements")
            }
            PredictionError::Render(_) => write!(f, "failed to write rendered output"),
            PredictionError::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for PredictionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PredictionError::Load(err)
            | PredictionError::Inference(err)
            | PredictionError::Engine(err) => Some(err),
            PredictionError::Render(err) => Some(err),
            _ => None,
        }
    }
}

impl From<OnnxError> for PredictionError {
    fn from(err: OnnxError) -> Self {
        PredictionError::Engine(err)
    }
}

impl From<fmt::Error> for PredictionError {
    fn from(err: fmt::Error) -> Self {
        PredictionError::Render(err)
    }
}

impl PredictionError {
    /// The engine status behind this error, if any
    pub fn onnx_error(&self) -> Option<&OnnxError> {
        match self {
            PredictionError::Load(err)
            | PredictionError::Inference(err)
            | PredictionError::Engine(err) => Some(err),
            _ => None,
        }
    }
}
