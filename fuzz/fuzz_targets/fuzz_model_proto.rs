#![no_main]
use libfuzzer_sys::fuzz_target;
use onnx::{DEFAULT_API_VERSION, Onnx, proto::ModelProto};
use prediction::{PredictionSession, RandomInputs};
use std::sync::{Arc, OnceLock};

fn runtime() -> &'static Arc<Onnx> {
    static ONNX: OnceLock<Arc<Onnx>> = OnceLock::new();
    ONNX.get_or_init(|| Onnx::new(DEFAULT_API_VERSION).unwrap())
}

// decoded, then re-serialized by the session
fuzz_target!(|data: &[u8]| {
    let Ok(model) = ModelProto::from_bytes(data) else {
        return;
    };
    let mut session = match PredictionSession::from_description(runtime(), &model) {
        Ok(session) => session,
        Err(_) => return,
    };
    let _ = session.describe_outputs();
    if session.setup_input(&mut RandomInputs::new(String::new()), 1).is_err() {
        return;
    }
    if session.run_inference().is_ok() {
        let _ = session.render_outputs(&mut String::new());
    }
});
