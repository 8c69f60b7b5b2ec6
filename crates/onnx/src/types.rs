use std::fmt;

/// Element type of a tensor, mirroring `ONNXTensorElementDataType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Undefined,
    Float,
    Uint8,
    Int8,
    Uint16,
    Int16,
    Int32,
    Int64,
    String,
    Bool,
    Float16,
    Double,
    Uint32,
    Uint64,
    Complex64,
    Complex128,
    BFloat16,
    Float8E4M3FN,
    Float8E4M3FNUZ,
    Float8E5M2,
    Float8E5M2FNUZ,
    Uint4,
    Int4,
}

impl ElementType {
    /// Decode the runtime's integer tag. Returns `None` for tags this binding does not know.
    pub fn from_raw(raw: i32) -> Option<Self> {
        Some(match raw {
            0 => ElementType::Undefined,
            1 => ElementType::Float,
            2 => ElementType::Uint8,
            3 => ElementType::Int8,
            4 => ElementType::Uint16,
            5 => ElementType::Int16,
            6 => ElementType::Int32,
            7 => ElementType::Int64,
            8 => ElementType::String,
            9 => ElementType::Bool,
            10 => ElementType::Float16,
            11 => ElementType::Double,
            12 => ElementType::Uint32,
            13 => ElementType::Uint64,
            14 => ElementType::Complex64,
            15 => ElementType::Complex128,
            16 => ElementType::BFloat16,
            17 => ElementType::Float8E4M3FN,
            18 => ElementType::Float8E4M3FNUZ,
            19 => ElementType::Float8E5M2,
            20 => ElementType::Float8E5M2FNUZ,
            21 => ElementType::Uint4,
            22 => ElementType::Int4,
            _ => return None,
        })
    }

    pub fn as_raw(self) -> i32 {
        match self {
            ElementType::Undefined => 0,
            ElementType::Float => 1,
            ElementType::Uint8 => 2,
            ElementType::Int8 => 3,
            ElementType::Uint16 => 4,
            ElementType::Int16 => 5,
            ElementType::Int32 => 6,
            ElementType::Int64 => 7,
            ElementType::String => 8,
            ElementType::Bool => 9,
            ElementType::Float16 => 10,
            ElementType::Double => 11,
            ElementType::Uint32 => 12,
            ElementType::Uint64 => 13,
            ElementType::Complex64 => 14,
            ElementType::Complex128 => 15,
            ElementType::BFloat16 => 16,
            ElementType::Float8E4M3FN => 17,
            ElementType::Float8E4M3FNUZ => 18,
            ElementType::Float8E5M2 => 19,
            ElementType::Float8E5M2FNUZ => 20,
            ElementType::Uint4 => 21,
            ElementType::Int4 => 22,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementType::Undefined => "undefined",
            ElementType::Float => "float32",
            ElementType::Uint8 => "uint8",
            ElementType::Int8 => "int8",
            ElementType::Uint16 => "uint16",
            ElementType::Int16 => "int16",
            ElementType::Int32 => "int32",
            ElementType::Int64 => "int64",
            ElementType::String => "string",
            ElementType::Bool => "bool",
            ElementType::Float16 => "float16",
            ElementType::Double => "float64",
            ElementType::Uint32 => "uint32",
            ElementType::Uint64 => "uint64",
            ElementType::Complex64 => "complex64",
            ElementType::Complex128 => "complex128",
            ElementType::BFloat16 => "bfloat16",
            ElementType::Float8E4M3FN => "float8e4m3fn",
            ElementType::Float8E4M3FNUZ => "float8e4m3fnuz",
            ElementType::Float8E5M2 => "float8e5m2",
            ElementType::Float8E5M2FNUZ => "float8e5m2fnuz",
            ElementType::Uint4 => "uint4",
            ElementType::Int4 => "int4",
        };
        f.write_str(name)
    }
}

/// Top-level classification of a model input or output (`ONNXType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OnnxType {
    Unknown,
    Tensor,
    Sequence,
    Map,
    Opaque,
    SparseTensor,
    Optional,
}

impl OnnxType {
    /// Unknown tags collapse into `OnnxType::Unknown`.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => OnnxType::Tensor,
            2 => OnnxType::Sequence,
            3 => OnnxType::Map,
            4 => OnnxType::Opaque,
            5 => OnnxType::SparseTensor,
            6 => OnnxType::Optional,
            _ => OnnxType::Unknown,
        }
    }
}

impl fmt::Display for OnnxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OnnxType::Unknown => "unknown",
            OnnxType::Tensor => "tensor",
            OnnxType::Sequence => "sequence",
            OnnxType::Map => "map",
            OnnxType::Opaque => "opaque",
            OnnxType::SparseTensor => "sparse tensor",
            OnnxType::Optional => "optional",
        };
        f.write_str(name)
    }
}

/// Declared type of a session input or output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeInfo {
    /// Dense tensor. Symbolic dimensions are reported as `-1`.
    Tensor {
        element_type: ElementType,
        shape: Vec<i64>,
    },
    Other(OnnxType),
}

impl TypeInfo {
    pub fn onnx_type(&self) -> OnnxType {
        match self {
            TypeInfo::Tensor { .. } => OnnxType::Tensor,
            TypeInfo::Other(kind) => *kind,
        }
    }
}

/// Status code of a failed runtime call (`OrtErrorCode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Ok,
    Fail,
    InvalidArgument,
    NoSuchFile,
    NoModel,
    EngineError,
    RuntimeException,
    InvalidProtobuf,
    ModelLoaded,
    NotImplemented,
    InvalidGraph,
    EpFail,
    ModelLoadCanceled,
    ModelRequiresCompilation,
    NotFound,
    Unknown(i32),
}

impl ErrorCode {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => ErrorCode::Ok,
            1 => ErrorCode::Fail,
            2 => ErrorCode::InvalidArgument,
            3 => ErrorCode::NoSuchFile,
            4 => ErrorCode::NoModel,
            5 => ErrorCode::EngineError,
            6 => ErrorCode::RuntimeException,
            7 => ErrorCode::InvalidProtobuf,
            8 => ErrorCode::ModelLoaded,
            9 => ErrorCode::NotImplemented,
            10 => ErrorCode::InvalidGraph,
            11 => ErrorCode::EpFail,
            12 => ErrorCode::ModelLoadCanceled,
            13 => ErrorCode::ModelRequiresCompilation,
            14 => ErrorCode::NotFound,
            other => ErrorCode::Unknown(other),
        }
    }
}
