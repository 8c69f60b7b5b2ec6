use {
    crate::{ModelDescription, ModelSource, PredictionError, TensorBuffer, render},
    base::TEST_LOG_TARGET,
    onnx::{ElementType, ModelFormat, Onnx, OnnxError, Session, SessionOptions, TypeInfo, Value},
    std::{fmt, path::Path, sync::Arc},
};

/// Largest tensor the harness will generate or shape, in elements
pub const MAX_ELEMENTS: usize = 1 << 26;

/// Element type and resolved shape of a dense tensor input or output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorSpec {
    pub element_type: ElementType,
    pub shape: Vec<usize>,
}

impl TensorSpec {
    /// Symbolic (negative) dimensions resolve to 1
    pub fn from_declared(element_type: ElementType, declared: &[i64]) -> Self {
        TensorSpec {
            element_type,
            shape: declared
                .iter()
                .map(|&d| if d < 0 { 1 } else { usize::try_from(d).unwrap_or(usize::MAX) })
                .collect(),
        }
    }

    /// Product of the shape; a scalar has one element
    ///
    /// Shapes whose product overflows or exceeds [`MAX_ELEMENTS`] give `TooManyElements`.
    pub fn element_count(&self) -> Result<usize, PredictionError> {
        self.shape
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .filter(|&count| count <= MAX_ELEMENTS)
            .ok_or_else(|| PredictionError::TooManyElements {
                shape: self.shape.clone(),
            })
    }
}

/// Name and declared type of one model input or output
#[derive(Debug, Clone, PartialEq)]
pub struct IoDescription {
    pub name: String,
    pub type_info: TypeInfo,
}

impl fmt::Display for IoDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_info {
            TypeInfo::Tensor { element_type, shape } => {
                write!(f, "{}: tensor({}) ", self.name, element_type)?;
                render::write_list(f, shape)
            }
            TypeInfo::Other(kind) => write!(f, "{}: {}", self.name, kind),
        }
    }
}

/// A loaded model plus its input and output slots, for one prediction cycle
pub struct PredictionSession {
    // dropped before the bytes it was created from
    session: Session,
    _model: Option<Vec<u8>>,
    input_names: Vec<String>,
    output_names: Vec<String>,
    input_values: Vec<Option<Value>>,
    output_values: Vec<Option<Value>>,
}

impl PredictionSession {
    /// Load a model file with default options
    pub fn from_file(onnx: &Arc<Onnx>, path: impl AsRef<Path>) -> Result<Self, PredictionError> {
        let session = onnx
            .create_session_from_file(path, &SessionOptions::default())
            .map_err(PredictionError::Load)?;
        Self::init(session, None)
    }

    /// Serialize `description` into an exactly sized buffer and load that
    pub fn from_description(
        onnx: &Arc<Onnx>,
        description: &dyn ModelDescription,
    ) -> Result<Self, PredictionError> {
        let len = description.encoded_len();
        let mut bytes = Vec::with_capacity(len);
        description
            .encode_into(&mut bytes)
            .map_err(PredictionError::Serialization)?;
        if bytes.len() != len {
            return Err(PredictionError::Serialization(format!(
                "encoded {} bytes, expected {}",
                bytes.len(),
                len
            )));
        }
        let session = onnx
            .create_session_from_memory(&bytes, &SessionOptions::default())
            .map_err(PredictionError::Load)?;
        Self::init(session, Some(bytes))
    }

    /// Copy serialized bytes and load them with the loader pinned to `format`
    pub fn from_bytes(onnx: &Arc<Onnx>, bytes: &[u8], format: ModelFormat) -> Result<Self, PredictionError> {
        Self::from_owned_bytes(onnx, bytes.to_vec(), format)
    }

    fn from_owned_bytes(onnx: &Arc<Onnx>, bytes: Vec<u8>, format: ModelFormat) -> Result<Self, PredictionError> {
        let options = SessionOptions::default().with_format(format);
        let session = onnx
            .create_session_from_memory(&bytes, &options)
            .map_err(PredictionError::Load)?;
        Self::init(session, Some(bytes))
    }

    pub fn new(onnx: &Arc<Onnx>, source: ModelSource) -> Result<Self, PredictionError> {
        match source {
            ModelSource::File(path) => Self::from_file(onnx, path),
            ModelSource::Description(description) => Self::from_description(onnx, description.as_ref()),
            ModelSource::Bytes { bytes, format } => Self::from_owned_bytes(onnx, bytes, format),
        }
    }

    fn init(session: Session, model: Option<Vec<u8>>) -> Result<Self, PredictionError> {
        session.onnx.enable_telemetry_events()?;

        let input_names = (0..session.input_count()?)
            .map(|i| session.input_name(i))
            .collect::<onnx::Result<Vec<_>>>()?;
        let output_names = (0..session.output_count()?)
            .map(|i| session.output_name(i))
            .collect::<onnx::Result<Vec<_>>>()?;
        log::debug!(
            "session loaded: inputs {:?}, outputs {:?}",
            input_names,
            output_names
        );

        Ok(PredictionSession {
            session,
            _model: model,
            input_values: input_names.iter().map(|_| None).collect(),
            output_values: output_names.iter().map(|_| None).collect(),
            input_names,
            output_names,
        })
    }

    pub fn input_count(&self) -> usize {
        self.input_names.len()
    }

    pub fn output_count(&self) -> usize {
        self.output_names.len()
    }

    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn describe_inputs(&self) -> Result<Vec<IoDescription>, PredictionError> {
        self.input_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Ok(IoDescription {
                    name: name.clone(),
                    type_info: self.session.input_type(i)?,
                })
            })
            .collect()
    }

    pub fn describe_outputs(&self) -> Result<Vec<IoDescription>, PredictionError> {
        self.output_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Ok(IoDescription {
                    name: name.clone(),
                    type_info: self.session.output_type(i)?,
                })
            })
            .collect()
    }

    fn check_input_index(&self, index: usize) -> Result<(), PredictionError> {
        if index >= self.input_count() {
            return Err(PredictionError::InputIndex {
                index,
                count: self.input_count(),
            });
        }
        Ok(())
    }

    /// Declared tensor type of input `index`
    ///
    /// Sequences, maps and other non-tensor inputs give `UnsupportedInputKind`.
    pub fn tensor_input(&self, index: usize) -> Result<TensorSpec, PredictionError> {
        self.check_input_index(index)?;
        match self.session.input_type(index)? {
            TypeInfo::Tensor { element_type, shape } => Ok(TensorSpec::from_declared(element_type, &shape)),
            TypeInfo::Other(kind) => Err(PredictionError::UnsupportedInputKind { index, kind }),
        }
    }

    /// Wrap `buffer` as input `index`, replacing any earlier value
    ///
    /// The buffer takes the declared shape when its length matches, otherwise a
    /// flat one, leaving the engine to reject it at run time.
    pub fn set_input(&mut self, index: usize, buffer: TensorBuffer) -> Result<(), PredictionError> {
        self.check_input_index(index)?;
        let shape = match self.tensor_input(index) {
            Ok(spec) if matches!(spec.element_count(), Ok(count) if count == buffer.len()) => spec.shape,
            _ => vec![buffer.len()],
        };
        let value = buffer.into_value(&self.session.onnx, &shape)?;
        self.input_values[index] = Some(value);
        Ok(())
    }

    pub fn input(&self, index: usize) -> Option<&Value> {
        self.input_values.get(index).and_then(Option::as_ref)
    }

    pub fn output(&self, index: usize) -> Option<&Value> {
        self.output_values.get(index).and_then(Option::as_ref)
    }

    pub fn output_values(&self) -> &[Option<Value>] {
        &self.output_values
    }

    /// Run the model once over the current inputs
    ///
    /// Engine failures are logged with a marker and returned unchanged as
    /// `Inference`. Nothing is retried.
    pub fn run_inference(&mut self) -> Result<(), PredictionError> {
        log::info!(target: TEST_LOG_TARGET, "inference starting");

        let result = self.run();
        match &result {
            Ok(()) => log::info!(target: TEST_LOG_TARGET, "inference completed"),
            Err(err) => log::error!(target: TEST_LOG_TARGET, "Something went wrong in inference: {}", err),
        }
        result
    }

    fn run(&mut self) -> Result<(), PredictionError> {
        let mut inputs = Vec::with_capacity(self.input_count());
        for (name, value) in self.input_names.iter().zip(&self.input_values) {
            match value {
                Some(value) => inputs.push((name.as_str(), value)),
                None => {
                    return Err(PredictionError::Inference(OnnxError::runtime_error(format!(
                        "input '{}' was not set",
                        name
                    ))));
                }
            }
        }
        let output_names: Vec<&str> = self.output_names.iter().map(String::as_str).collect();

        let outputs = self
            .session
            .run(&inputs, &output_names)
            .map_err(PredictionError::Inference)?;

        for (slot, value) in self.output_values.iter_mut().zip(outputs) {
            *slot = Some(value);
        }
        Ok(())
    }

    /// Every output as `name = [..]` lines, in declared order
    pub fn render_outputs<W: fmt::Write + ?Sized>(&self, out: &mut W) -> Result<(), PredictionError> {
        render::write_outputs(out, &self.output_names, &self.output_values)
    }

    /// `output data:` followed by [`render_outputs`](Self::render_outputs)
    pub fn print_output_values<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> Result<(), PredictionError> {
        sink.write_str("output data:\n")?;
        self.render_outputs(sink)
    }
}

impl fmt::Display for PredictionSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render_outputs(f).map_err(|_| fmt::Error)
    }
}
