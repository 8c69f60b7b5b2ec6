use {
    anyhow::{Context, Result, bail},
    base::{Console, TestLog},
    onnx::Onnx,
    prediction::*,
    std::path::PathBuf,
};

const USAGE: &str = "usage: predict <model> [config.json]";

// .onnx files load from disk; anything else is read as raw bytes in the configured format
fn model_source(path: PathBuf, config: &HarnessConfig) -> Result<ModelSource> {
    if path.extension().is_some_and(|ext| ext == "onnx") {
        return Ok(ModelSource::File(path));
    }
    let bytes = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    Ok(ModelSource::Bytes {
        bytes,
        format: config.model_format,
    })
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(model_path) = args.next() else {
        bail!(USAGE);
    };
    let config = match args.next() {
        Some(path) => HarnessConfig::from_file(path)?,
        None => HarnessConfig::default(),
    }
    .apply_env()?;

    match &config.log_dir {
        Some(dir) => base::init_file_logger(dir).with_context(|| format!("log dir {}", dir.display()))?,
        None => base::init_stdout_logger(),
    }
    log::info!("predict {} (seed {}, {:?})", model_path, config.seed, config.model_format);

    let onnx = Onnx::new(config.api_version)?;
    let source = model_source(PathBuf::from(&model_path), &config)?;
    let mut session = PredictionSession::new(&onnx, source)?;

    for input in session.describe_inputs()? {
        log::info!("input {}", input);
    }
    for output in session.describe_outputs()? {
        log::info!("output {}", output);
    }

    let summary = session.setup_input(&mut RandomInputs::new(TestLog::new()), config.seed)?;
    if !summary.skipped.is_empty() {
        log::warn!("{} inputs left unset: {:?}", summary.skipped.len(), summary.skipped);
    }

    session.run_inference()?;

    // outputs always reach the triage log; the operator sees them on stdout too
    session.print_output_values(&mut TestLog::new())?;
    if config.print_outputs {
        session.print_output_values(&mut Console::new())?;
    }
    Ok(())
}
