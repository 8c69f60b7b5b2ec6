#![no_main]
use libfuzzer_sys::fuzz_target;
use onnx::{DEFAULT_API_VERSION, ModelFormat, Onnx};
use prediction::{PredictionSession, RandomInputs};
use std::sync::{Arc, OnceLock};

fn runtime() -> &'static Arc<Onnx> {
    static ONNX: OnceLock<Arc<Onnx>> = OnceLock::new();
    ONNX.get_or_init(|| Onnx::new(DEFAULT_API_VERSION).unwrap())
}

// first byte picks the loader format, the rest is the model
fuzz_target!(|data: &[u8]| {
    let Some((&selector, model)) = data.split_first() else {
        return;
    };
    let format = if selector & 1 == 0 { ModelFormat::Ort } else { ModelFormat::Onnx };

    let mut session = match PredictionSession::from_bytes(runtime(), model, format) {
        Ok(session) => session,
        Err(_) => return,
    };
    if session.setup_input(&mut RandomInputs::new(String::new()), 0).is_err() {
        return;
    }
    if session.run_inference().is_ok() {
        let _ = session.render_outputs(&mut String::new());
    }
});
