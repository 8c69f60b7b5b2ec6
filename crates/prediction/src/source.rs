use {
    onnx::ModelFormat,
    std::path::PathBuf,
};

/// Structured model that can serialize itself
///
/// Any `prost` message qualifies, `onnx::proto::ModelProto` in particular.
pub trait ModelDescription {
    /// Exact number of bytes `encode_into` will append
    fn encoded_len(&self) -> usize;

    fn encode_into(&self, buf: &mut Vec<u8>) -> Result<(), String>;
}

impl<M: prost::Message> ModelDescription for M {
    fn encoded_len(&self) -> usize {
        prost::Message::encoded_len(self)
    }

    fn encode_into(&self, buf: &mut Vec<u8>) -> Result<(), String> {
        prost::Message::encode(self, buf).map_err(|e| e.to_string())
    }
}

/// Where a session's model comes from
pub enum ModelSource {
    File(PathBuf),
    Description(Box<dyn ModelDescription>),
    /// Already serialized; `format` pins the loader
    Bytes { bytes: Vec<u8>, format: ModelFormat },
}

impl ModelSource {
    /// Raw bytes in the default (ORT) format
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        ModelSource::Bytes {
            bytes: bytes.into(),
            format: ModelFormat::default(),
        }
    }

    pub fn description(description: impl ModelDescription + 'static) -> Self {
        ModelSource::Description(Box::new(description))
    }
}

impl std::fmt::Debug for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelSource::File(path) => f.debug_tuple("File").field(path).finish(),
            ModelSource::Description(description) => f
                .debug_struct("Description")
                .field("encoded_len", &description.encoded_len())
                .finish(),
            ModelSource::Bytes { bytes, format } => f
                .debug_struct("Bytes")
                .field("len", &bytes.len())
                .field("format", format)
                .finish(),
        }
    }
}
