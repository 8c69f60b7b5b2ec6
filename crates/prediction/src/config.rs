use {
    crate::PredictionError,
    onnx::{DEFAULT_API_VERSION, ModelFormat},
    serde::{Deserialize, Serialize},
    std::path::{Path, PathBuf},
};

pub const ENV_SEED: &str = "PREDICT_SEED";
pub const ENV_MODEL_FORMAT: &str = "PREDICT_MODEL_FORMAT";
pub const ENV_LOG_DIR: &str = "PREDICT_LOG_DIR";

/// Settings for one harness run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Seed of the first generated input
    pub seed: u64,
    /// Loader format for raw model bytes
    #[serde(with = "format_name")]
    pub model_format: ModelFormat,
    pub api_version: u32,
    /// Log into day files here instead of stdout
    pub log_dir: Option<PathBuf>,
    /// Echo output data to stdout as well as the test log
    pub print_outputs: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            model_format: ModelFormat::Ort,
            api_version: DEFAULT_API_VERSION,
            log_dir: None,
            print_outputs: true,
        }
    }
}

impl HarnessConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_model_format(mut self, model_format: ModelFormat) -> Self {
        self.model_format = model_format;
        self
    }

    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    pub fn with_print_outputs(mut self, print_outputs: bool) -> Self {
        self.print_outputs = print_outputs;
        self
    }

    /// Read a JSON config; missing fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PredictionError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| PredictionError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, PredictionError> {
        serde_json::from_str(text).map_err(|e| PredictionError::Config(e.to_string()))
    }

    /// Override from `PREDICT_SEED`, `PREDICT_MODEL_FORMAT` and `PREDICT_LOG_DIR`
    pub fn apply_env(self) -> Result<Self, PredictionError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`apply_env`](Self::apply_env) with variables from `lookup`
    pub fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PredictionError> {
        if let Some(seed) = lookup(ENV_SEED) {
            self.seed = seed
                .trim()
                .parse()
                .map_err(|e| PredictionError::Config(format!("{}={:?}: {}", ENV_SEED, seed, e)))?;
        }
        if let Some(format) = lookup(ENV_MODEL_FORMAT) {
            self.model_format = parse_model_format(&format)?;
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            self.log_dir = if dir.is_empty() { None } else { Some(PathBuf::from(dir)) };
        }
        Ok(self)
    }
}

/// `ort` or `onnx`, any case
pub fn parse_model_format(name: &str) -> Result<ModelFormat, PredictionError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "ort" => Ok(ModelFormat::Ort),
        "onnx" => Ok(ModelFormat::Onnx),
        _ => Err(PredictionError::Config(format!(
            "unknown model format {:?} (expected ORT or ONNX)",
            name
        ))),
    }
}

mod format_name {
    use {
        onnx::ModelFormat,
        serde::{Deserialize, Deserializer, Serializer, de::Error},
    };

    pub fn serialize<S: Serializer>(format: &ModelFormat, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(format.config_value())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ModelFormat, D::Error> {
        let name = String::deserialize(deserializer)?;
        super::parse_model_format(&name).map_err(D::Error::custom)
    }
}
