use {
    onnx::{ElementType, Onnx, Value},
    std::{fmt, sync::Arc},
};

/// Owned, type-tagged flat tensor data
#[derive(Debug, Clone, PartialEq)]
pub enum TensorBuffer {
    Float(Vec<f32>),
    Int32(Vec<i32>),
}

impl TensorBuffer {
    pub fn element_type(&self) -> ElementType {
        match self {
            TensorBuffer::Float(_) => ElementType::Float,
            TensorBuffer::Int32(_) => ElementType::Int32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TensorBuffer::Float(data) => data.len(),
            TensorBuffer::Int32(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hand the data to the engine as a tensor of `shape`, without copying
    pub fn into_value(self, onnx: &Arc<Onnx>, shape: &[usize]) -> onnx::Result<Value> {
        match self {
            TensorBuffer::Float(data) => Value::from_vec(onnx, shape, data),
            TensorBuffer::Int32(data) => Value::from_vec(onnx, shape, data),
        }
    }
}

impl From<Vec<f32>> for TensorBuffer {
    fn from(data: Vec<f32>) -> Self {
        TensorBuffer::Float(data)
    }
}

impl From<Vec<i32>> for TensorBuffer {
    fn from(data: Vec<i32>) -> Self {
        TensorBuffer::Int32(data)
    }
}

/// `[a, b, c]`
impl fmt::Display for TensorBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorBuffer::Float(data) => crate::render::write_list(f, data),
            TensorBuffer::Int32(data) => crate::render::write_list(f, data),
        }
    }
}
