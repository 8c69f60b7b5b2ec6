#![allow(dead_code)]

use {
    onnx::{
        DEFAULT_API_VERSION, Onnx,
        proto::{GraphProto, ModelProto, NodeProto, ValueInfoProto, data_type},
    },
    prost::Message,
    std::{
        path::PathBuf,
        sync::{Arc, OnceLock},
    },
};

/// One runtime per test binary
pub fn runtime() -> Arc<Onnx> {
    static ONNX: OnceLock<Arc<Onnx>> = OnceLock::new();
    ONNX.get_or_init(|| Onnx::new(DEFAULT_API_VERSION).expect("libonnxruntime must be available"))
        .clone()
}

fn model(name: &str, nodes: Vec<NodeProto>, inputs: Vec<ValueInfoProto>, outputs: Vec<ValueInfoProto>) -> ModelProto {
    ModelProto::new(
        GraphProto {
            node: nodes,
            name: name.to_string(),
            input: inputs,
            output: outputs,
            ..Default::default()
        },
        13,
    )
}

/// y = x, float32[2]
pub fn identity_model() -> ModelProto {
    identity_with_dims(&[2])
}

pub fn identity_with_dims(dims: &[i64]) -> ModelProto {
    model(
        "identity",
        vec![NodeProto::new("Identity", &["x"], &["y"])],
        vec![ValueInfoProto::tensor("x", data_type::FLOAT, dims)],
        vec![ValueInfoProto::tensor("y", data_type::FLOAT, dims)],
    )
}

/// sum = a + b, float32[2]
pub fn add_model() -> ModelProto {
    model(
        "add",
        vec![NodeProto::new("Add", &["a", "b"], &["sum"])],
        vec![
            ValueInfoProto::tensor("a", data_type::FLOAT, &[2]),
            ValueInfoProto::tensor("b", data_type::FLOAT, &[2]),
        ],
        vec![ValueInfoProto::tensor("sum", data_type::FLOAT, &[2])],
    )
}

/// Passes through float32[4] and int32[3]
pub fn float_and_int_model() -> ModelProto {
    model(
        "float_and_int",
        vec![
            NodeProto::new("Identity", &["f"], &["f_out"]),
            NodeProto::new("Identity", &["i"], &["i_out"]),
        ],
        vec![
            ValueInfoProto::tensor("f", data_type::FLOAT, &[4]),
            ValueInfoProto::tensor("i", data_type::INT32, &[3]),
        ],
        vec![
            ValueInfoProto::tensor("f_out", data_type::FLOAT, &[4]),
            ValueInfoProto::tensor("i_out", data_type::INT32, &[3]),
        ],
    )
}

/// Sequence input `s` (length as int64 `n`) followed by float32[4] `x` (passed through as `y`)
pub fn sequence_and_tensor_model() -> ModelProto {
    model(
        "sequence_and_tensor",
        vec![
            NodeProto::new("SequenceLength", &["s"], &["n"]),
            NodeProto::new("Identity", &["x"], &["y"]),
        ],
        vec![
            ValueInfoProto::sequence("s", data_type::FLOAT, &[2]),
            ValueInfoProto::tensor("x", data_type::FLOAT, &[4]),
        ],
        vec![
            ValueInfoProto::tensor("n", data_type::INT64, &[]),
            ValueInfoProto::tensor("y", data_type::FLOAT, &[4]),
        ],
    )
}

/// y = x, int64[3]: an input the random generator cannot fill
pub fn int64_model() -> ModelProto {
    model(
        "int64_identity",
        vec![NodeProto::new("Identity", &["x"], &["y"])],
        vec![ValueInfoProto::tensor("x", data_type::INT64, &[3])],
        vec![ValueInfoProto::tensor("y", data_type::INT64, &[3])],
    )
}

pub fn to_bytes(model: &ModelProto) -> Vec<u8> {
    model.encode_to_vec()
}

/// Serialized `model` in the temp dir, removed on drop
pub struct TempModel {
    pub path: PathBuf,
}

impl TempModel {
    pub fn new(tag: &str, model: &ModelProto) -> Self {
        let path = std::env::temp_dir().join(format!("prediction-test-{}-{}.onnx", std::process::id(), tag));
        std::fs::write(&path, to_bytes(model)).expect("Failed to write model file");
        TempModel { path }
    }
}

impl Drop for TempModel {
    fn drop(&mut self) {
        std::fs::remove_file(&self.path).ok();
    }
}

/// The bracketed part of each `name = [..]` line
pub fn bracketed(rendered: &str) -> Vec<String> {
    rendered
        .lines()
        .filter_map(|line| line.split_once(" = ").map(|(_, values)| values.to_string()))
        .collect()
}
