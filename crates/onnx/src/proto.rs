//! The ONNX protobuf schema (`onnx.proto3`, with the ONNX-ML opaque type)
//!
//! Enough to describe graphs in memory, hand them to the runtime as bytes, and
//! decode fuzzer input back into a model without dropping fields on the way
//! through. Field tags follow the upstream schema so encoded models are
//! wire-compatible with real `.onnx` files. Enums are carried as plain `i32`
//! with their values in the `data_type`, `attribute_type` and `data_location`
//! modules.

use prost::Message;

/// `TensorProto.DataType`, as used by `TypeProto.Tensor.elem_type`
pub mod data_type {
    pub const FLOAT: i32 = 1;
    pub const UINT8: i32 = 2;
    pub const INT8: i32 = 3;
    pub const INT32: i32 = 6;
    pub const INT64: i32 = 7;
    pub const STRING: i32 = 8;
    pub const BOOL: i32 = 9;
    pub const FLOAT16: i32 = 10;
    pub const DOUBLE: i32 = 11;
}

/// `AttributeProto.AttributeType`
pub mod attribute_type {
    pub const UNDEFINED: i32 = 0;
    pub const FLOAT: i32 = 1;
    pub const INT: i32 = 2;
    pub const STRING: i32 = 3;
    pub const TENSOR: i32 = 4;
    pub const GRAPH: i32 = 5;
    pub const FLOATS: i32 = 6;
    pub const INTS: i32 = 7;
    pub const STRINGS: i32 = 8;
    pub const TENSORS: i32 = 9;
    pub const GRAPHS: i32 = 10;
    pub const SPARSE_TENSOR: i32 = 11;
    pub const SPARSE_TENSORS: i32 = 12;
    pub const TYPE_PROTO: i32 = 13;
    pub const TYPE_PROTOS: i32 = 14;
}

/// `TensorProto.DataLocation`
pub mod data_location {
    pub const DEFAULT: i32 = 0;
    pub const EXTERNAL: i32 = 1;
}

/// IR version written by [`ModelProto::new`]
pub const IR_VERSION: i64 = 8;

#[derive(Clone, PartialEq, Message)]
pub struct ModelProto {
    #[prost(int64, tag = "1")]
    pub ir_version: i64,
    #[prost(string, tag = "2")]
    pub producer_name: String,
    #[prost(string, tag = "3")]
    pub producer_version: String,
    #[prost(string, tag = "4")]
    pub domain: String,
    #[prost(int64, tag = "5")]
    pub model_version: i64,
    #[prost(string, tag = "6")]
    pub doc_string: String,
    #[prost(message, optional, tag = "7")]
    pub graph: Option<GraphProto>,
    #[prost(message, repeated, tag = "8")]
    pub opset_import: Vec<OperatorSetIdProto>,
    #[prost(message, repeated, tag = "14")]
    pub metadata_props: Vec<StringStringEntryProto>,
    #[prost(message, repeated, tag = "20")]
    pub training_info: Vec<TrainingInfoProto>,
    #[prost(message, repeated, tag = "25")]
    pub functions: Vec<FunctionProto>,
}

#[derive(Clone, PartialEq, Message)]
pub struct OperatorSetIdProto {
    #[prost(string, tag = "1")]
    pub domain: String,
    #[prost(int64, tag = "2")]
    pub version: i64,
}

#[derive(Clone, PartialEq, Message)]
pub struct StringStringEntryProto {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct TrainingInfoProto {
    #[prost(message, optional, tag = "1")]
    pub initialization: Option<GraphProto>,
    #[prost(message, optional, tag = "2")]
    pub algorithm: Option<GraphProto>,
    #[prost(message, repeated, tag = "3")]
    pub initialization_binding: Vec<StringStringEntryProto>,
    #[prost(message, repeated, tag = "4")]
    pub update_binding: Vec<StringStringEntryProto>,
}

#[derive(Clone, PartialEq, Message)]
pub struct FunctionProto {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, repeated, tag = "4")]
    pub input: Vec<String>,
    #[prost(string, repeated, tag = "5")]
    pub output: Vec<String>,
    #[prost(string, repeated, tag = "6")]
    pub attribute: Vec<String>,
    #[prost(message, repeated, tag = "7")]
    pub node: Vec<NodeProto>,
    #[prost(string, tag = "8")]
    pub doc_string: String,
    #[prost(message, repeated, tag = "9")]
    pub opset_import: Vec<OperatorSetIdProto>,
    #[prost(string, tag = "10")]
    pub domain: String,
    #[prost(message, repeated, tag = "11")]
    pub attribute_proto: Vec<AttributeProto>,
    #[prost(message, repeated, tag = "12")]
    pub value_info: Vec<ValueInfoProto>,
    #[prost(string, tag = "13")]
    pub overload: String,
    #[prost(message, repeated, tag = "14")]
    pub metadata_props: Vec<StringStringEntryProto>,
}

#[derive(Clone, PartialEq, Message)]
pub struct GraphProto {
    #[prost(message, repeated, tag = "1")]
    pub node: Vec<NodeProto>,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(message, repeated, tag = "5")]
    pub initializer: Vec<TensorProto>,
    #[prost(string, tag = "10")]
    pub doc_string: String,
    #[prost(message, repeated, tag = "11")]
    pub input: Vec<ValueInfoProto>,
    #[prost(message, repeated, tag = "12")]
    pub output: Vec<ValueInfoProto>,
    #[prost(message, repeated, tag = "13")]
    pub value_info: Vec<ValueInfoProto>,
    #[prost(message, repeated, tag = "14")]
    pub quantization_annotation: Vec<TensorAnnotation>,
    #[prost(message, repeated, tag = "15")]
    pub sparse_initializer: Vec<SparseTensorProto>,
    #[prost(message, repeated, tag = "16")]
    pub metadata_props: Vec<StringStringEntryProto>,
}

#[derive(Clone, PartialEq, Message)]
pub struct TensorAnnotation {
    #[prost(string, tag = "1")]
    pub tensor_name: String,
    #[prost(message, repeated, tag = "2")]
    pub quant_parameter_tensor_names: Vec<StringStringEntryProto>,
}

#[derive(Clone, PartialEq, Message)]
pub struct NodeProto {
    #[prost(string, repeated, tag = "1")]
    pub input: Vec<String>,
    #[prost(string, repeated, tag = "2")]
    pub output: Vec<String>,
    #[prost(string, tag = "3")]
    pub name: String,
    #[prost(string, tag = "4")]
    pub op_type: String,
    #[prost(message, repeated, tag = "5")]
    pub attribute: Vec<AttributeProto>,
    #[prost(string, tag = "6")]
    pub doc_string: String,
    #[prost(string, tag = "7")]
    pub domain: String,
    #[prost(string, tag = "8")]
    pub overload: String,
    #[prost(message, repeated, tag = "9")]
    pub metadata_props: Vec<StringStringEntryProto>,
}

/// Named operator attribute; `r#type` says which payload field is meaningful
#[derive(Clone, PartialEq, Message)]
pub struct AttributeProto {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(float, tag = "2")]
    pub f: f32,
    #[prost(int64, tag = "3")]
    pub i: i64,
    #[prost(bytes = "vec", tag = "4")]
    pub s: Vec<u8>,
    #[prost(message, optional, tag = "5")]
    pub t: Option<TensorProto>,
    #[prost(message, optional, tag = "6")]
    pub g: Option<GraphProto>,
    #[prost(float, repeated, tag = "7")]
    pub floats: Vec<f32>,
    #[prost(int64, repeated, tag = "8")]
    pub ints: Vec<i64>,
    #[prost(bytes = "vec", repeated, tag = "9")]
    pub strings: Vec<Vec<u8>>,
    #[prost(message, repeated, tag = "10")]
    pub tensors: Vec<TensorProto>,
    #[prost(message, repeated, tag = "11")]
    pub graphs: Vec<GraphProto>,
    #[prost(string, tag = "13")]
    pub doc_string: String,
    #[prost(message, optional, tag = "14")]
    pub tp: Option<TypeProto>,
    #[prost(message, repeated, tag = "15")]
    pub type_protos: Vec<TypeProto>,
    #[prost(int32, tag = "20")]
    pub r#type: i32,
    #[prost(string, tag = "21")]
    pub ref_attr_name: String,
    #[prost(message, optional, tag = "22")]
    pub sparse_tensor: Option<SparseTensorProto>,
    #[prost(message, repeated, tag = "23")]
    pub sparse_tensors: Vec<SparseTensorProto>,
}

#[derive(Clone, PartialEq, Message)]
pub struct TensorProto {
    #[prost(int64, repeated, tag = "1")]
    pub dims: Vec<i64>,
    #[prost(int32, tag = "2")]
    pub data_type: i32,
    #[prost(message, optional, tag = "3")]
    pub segment: Option<tensor_proto::Segment>,
    #[prost(float, repeated, tag = "4")]
    pub float_data: Vec<f32>,
    #[prost(int32, repeated, tag = "5")]
    pub int32_data: Vec<i32>,
    #[prost(bytes = "vec", repeated, tag = "6")]
    pub string_data: Vec<Vec<u8>>,
    #[prost(int64, repeated, tag = "7")]
    pub int64_data: Vec<i64>,
    #[prost(string, tag = "8")]
    pub name: String,
    #[prost(bytes = "vec", tag = "9")]
    pub raw_data: Vec<u8>,
    #[prost(double, repeated, tag = "10")]
    pub double_data: Vec<f64>,
    #[prost(uint64, repeated, tag = "11")]
    pub uint64_data: Vec<u64>,
    #[prost(string, tag = "12")]
    pub doc_string: String,
    #[prost(message, repeated, tag = "13")]
    pub external_data: Vec<StringStringEntryProto>,
    #[prost(int32, tag = "14")]
    pub data_location: i32,
    #[prost(message, repeated, tag = "16")]
    pub metadata_props: Vec<StringStringEntryProto>,
}

pub mod tensor_proto {
    use prost::Message;

    /// Chunk of a tensor too large for one message
    #[derive(Clone, PartialEq, Message)]
    pub struct Segment {
        #[prost(int64, tag = "1")]
        pub begin: i64,
        #[prost(int64, tag = "2")]
        pub end: i64,
    }
}

/// COO sparse tensor: `values` at `indices`, densely shaped by `dims`
#[derive(Clone, PartialEq, Message)]
pub struct SparseTensorProto {
    #[prost(message, optional, tag = "1")]
    pub values: Option<TensorProto>,
    #[prost(message, optional, tag = "2")]
    pub indices: Option<TensorProto>,
    #[prost(int64, repeated, tag = "3")]
    pub dims: Vec<i64>,
}

#[derive(Clone, PartialEq, Message)]
pub struct ValueInfoProto {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, optional, tag = "2")]
    pub r#type: Option<TypeProto>,
    #[prost(string, tag = "3")]
    pub doc_string: String,
    #[prost(message, repeated, tag = "4")]
    pub metadata_props: Vec<StringStringEntryProto>,
}

#[derive(Clone, PartialEq, Message)]
pub struct TypeProto {
    #[prost(oneof = "type_proto::Value", tags = "1, 4, 5, 7, 8, 9")]
    pub value: Option<type_proto::Value>,
    #[prost(string, tag = "6")]
    pub denotation: String,
}

pub mod type_proto {
    use prost::{Message, Oneof};

    #[derive(Clone, PartialEq, Message)]
    pub struct Tensor {
        #[prost(int32, tag = "1")]
        pub elem_type: i32,
        #[prost(message, optional, tag = "2")]
        pub shape: Option<super::TensorShapeProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct Sequence {
        #[prost(message, optional, boxed, tag = "1")]
        pub elem_type: Option<Box<super::TypeProto>>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct Map {
        #[prost(int32, tag = "1")]
        pub key_type: i32,
        #[prost(message, optional, boxed, tag = "2")]
        pub value_type: Option<Box<super::TypeProto>>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct Opaque {
        #[prost(string, tag = "1")]
        pub domain: String,
        #[prost(string, tag = "2")]
        pub name: String,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct SparseTensor {
        #[prost(int32, tag = "1")]
        pub elem_type: i32,
        #[prost(message, optional, tag = "2")]
        pub shape: Option<super::TensorShapeProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct Optional {
        #[prost(message, optional, boxed, tag = "1")]
        pub elem_type: Option<Box<super::TypeProto>>,
    }

    #[derive(Clone, PartialEq, Oneof)]
    pub enum Value {
        #[prost(message, tag = "1")]
        TensorType(Tensor),
        #[prost(message, tag = "4")]
        SequenceType(Sequence),
        #[prost(message, tag = "5")]
        MapType(Map),
        #[prost(message, tag = "7")]
        OpaqueType(Opaque),
        #[prost(message, tag = "8")]
        SparseTensorType(SparseTensor),
        #[prost(message, tag = "9")]
        OptionalType(Optional),
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct TensorShapeProto {
    #[prost(message, repeated, tag = "1")]
    pub dim: Vec<tensor_shape_proto::Dimension>,
}

pub mod tensor_shape_proto {
    use prost::{Message, Oneof};

    #[derive(Clone, PartialEq, Message)]
    pub struct Dimension {
        #[prost(oneof = "dimension::Value", tags = "1, 2")]
        pub value: Option<dimension::Value>,
        #[prost(string, tag = "3")]
        pub denotation: String,
    }

    pub mod dimension {
        use super::Oneof;

        #[derive(Clone, PartialEq, Oneof)]
        pub enum Value {
            #[prost(int64, tag = "1")]
            DimValue(i64),
            #[prost(string, tag = "2")]
            DimParam(String),
        }
    }
}

impl ModelProto {
    /// Model around `graph`, importing the default operator set at `opset`
    pub fn new(graph: GraphProto, opset: i64) -> Self {
        ModelProto {
            ir_version: IR_VERSION,
            producer_name: "prediction".to_string(),
            graph: Some(graph),
            opset_import: vec![OperatorSetIdProto {
                domain: String::new(),
                version: opset,
            }],
            ..Default::default()
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, prost::DecodeError> {
        Self::decode(bytes)
    }
}

impl NodeProto {
    pub fn new(op_type: &str, inputs: &[&str], outputs: &[&str]) -> Self {
        NodeProto {
            input: inputs.iter().map(|s| s.to_string()).collect(),
            output: outputs.iter().map(|s| s.to_string()).collect(),
            name: format!("{}_0", op_type.to_lowercase()),
            op_type: op_type.to_string(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, attribute: AttributeProto) -> Self {
        self.attribute.push(attribute);
        self
    }
}

impl AttributeProto {
    pub fn float(name: &str, value: f32) -> Self {
        AttributeProto {
            name: name.to_string(),
            f: value,
            r#type: attribute_type::FLOAT,
            ..Default::default()
        }
    }
}

impl ValueInfoProto {
    /// Dense tensor value. Negative dimensions become symbolic (`dim_param`).
    pub fn tensor(name: &str, elem_type: i32, dims: &[i64]) -> Self {
        Self::typed(name, TypeProto::tensor(elem_type, dims))
    }

    /// Sequence of dense tensors
    pub fn sequence(name: &str, elem_type: i32, dims: &[i64]) -> Self {
        Self::typed(
            name,
            TypeProto::from_value(type_proto::Value::SequenceType(type_proto::Sequence {
                elem_type: Some(Box::new(TypeProto::tensor(elem_type, dims))),
            })),
        )
    }

    /// Optional dense tensor
    pub fn optional(name: &str, elem_type: i32, dims: &[i64]) -> Self {
        Self::typed(
            name,
            TypeProto::from_value(type_proto::Value::OptionalType(type_proto::Optional {
                elem_type: Some(Box::new(TypeProto::tensor(elem_type, dims))),
            })),
        )
    }

    fn typed(name: &str, type_proto: TypeProto) -> Self {
        ValueInfoProto {
            name: name.to_string(),
            r#type: Some(type_proto),
            ..Default::default()
        }
    }
}

impl TypeProto {
    pub fn tensor(elem_type: i32, dims: &[i64]) -> Self {
        let dim = dims
            .iter()
            .enumerate()
            .map(|(i, &d)| tensor_shape_proto::Dimension {
                value: Some(if d < 0 {
                    tensor_shape_proto::dimension::Value::DimParam(format!("d{}", i))
                } else {
                    tensor_shape_proto::dimension::Value::DimValue(d)
                }),
                denotation: String::new(),
            })
            .collect();
        Self::from_value(type_proto::Value::TensorType(type_proto::Tensor {
            elem_type,
            shape: Some(TensorShapeProto { dim }),
        }))
    }

    fn from_value(value: type_proto::Value) -> Self {
        TypeProto {
            value: Some(value),
            denotation: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        prost::encoding::{WireType, encode_key, encode_varint},
    };

    fn identity() -> ModelProto {
        let graph = GraphProto {
            node: vec![NodeProto::new("Identity", &["x"], &["y"])],
            name: "identity".to_string(),
            input: vec![ValueInfoProto::tensor("x", data_type::FLOAT, &[2])],
            output: vec![ValueInfoProto::tensor("y", data_type::FLOAT, &[2])],
            ..Default::default()
        };
        ModelProto::new(graph, 13)
    }

    #[test]
    fn test_model_survives_decode() {
        let model = identity();
        let bytes = model.encode_to_vec();
        assert_eq!(bytes.len(), model.encoded_len());
        let decoded = ModelProto::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, model);
    }

    #[test]
    fn test_ir_version_is_first_field() {
        // field 1, varint: what every .onnx file starts with
        let bytes = identity().encode_to_vec();
        assert_eq!(bytes[0], 0x08);
        assert_eq!(bytes[1], IR_VERSION as u8);
    }

    #[test]
    fn test_symbolic_dimensions() {
        let info = ValueInfoProto::tensor("x", data_type::INT32, &[-1, 3]);
        let Some(type_proto::Value::TensorType(tensor)) = info.r#type.unwrap().value else {
            panic!("expected a tensor type");
        };
        let dims = tensor.shape.unwrap().dim;
        assert_eq!(
            dims[0].value,
            Some(tensor_shape_proto::dimension::Value::DimParam("d0".to_string()))
        );
        assert_eq!(dims[1].value, Some(tensor_shape_proto::dimension::Value::DimValue(3)));
    }

    fn len_field(tag: u32, payload: &[u8], buf: &mut Vec<u8>) {
        encode_key(tag, WireType::LengthDelimited, buf);
        encode_varint(payload.len() as u64, buf);
        buf.extend_from_slice(payload);
    }

    fn varint_field(tag: u32, value: u64, buf: &mut Vec<u8>) {
        encode_key(tag, WireType::Varint, buf);
        encode_varint(value, buf);
    }

    fn float_value_info(name: &str) -> Vec<u8> {
        let mut dim = Vec::new();
        varint_field(1, 2, &mut dim);
        let mut shape = Vec::new();
        len_field(1, &dim, &mut shape);
        let mut tensor = Vec::new();
        varint_field(1, data_type::FLOAT as u64, &mut tensor);
        len_field(2, &shape, &mut tensor);
        let mut type_proto = Vec::new();
        len_field(1, &tensor, &mut type_proto);
        let mut info = Vec::new();
        len_field(1, name.as_bytes(), &mut info);
        len_field(2, &type_proto, &mut info);
        info
    }

    // LeakyRelu(alpha = 0.5) over float[2], with model metadata, written field by field
    fn leaky_relu_bytes() -> Vec<u8> {
        let mut attribute = Vec::new();
        len_field(1, b"alpha", &mut attribute);
        encode_key(2, WireType::ThirtyTwoBit, &mut attribute);
        attribute.extend_from_slice(&0.5f32.to_le_bytes());
        varint_field(20, attribute_type::FLOAT as u64, &mut attribute);

        let mut node = Vec::new();
        len_field(1, b"x", &mut node);
        len_field(2, b"y", &mut node);
        len_field(4, b"LeakyRelu", &mut node);
        len_field(5, &attribute, &mut node);

        let mut graph = Vec::new();
        len_field(1, &node, &mut graph);
        len_field(2, b"leaky", &mut graph);
        len_field(11, &float_value_info("x"), &mut graph);
        len_field(12, &float_value_info("y"), &mut graph);

        let mut opset = Vec::new();
        varint_field(2, 13, &mut opset);

        let mut entry = Vec::new();
        len_field(1, b"author", &mut entry);
        len_field(2, b"fuzz", &mut entry);

        let mut model = Vec::new();
        varint_field(1, IR_VERSION as u64, &mut model);
        len_field(7, &graph, &mut model);
        len_field(8, &opset, &mut model);
        len_field(14, &entry, &mut model);
        model
    }

    #[test]
    fn test_node_attributes_survive_decode_and_encode() {
        let bytes = leaky_relu_bytes();
        let model = ModelProto::from_bytes(&bytes).unwrap();

        let node = &model.graph.as_ref().unwrap().node[0];
        assert_eq!(node.op_type, "LeakyRelu");
        assert_eq!(node.attribute, vec![AttributeProto::float("alpha", 0.5)]);
        assert_eq!(model.metadata_props[0].key, "author");
        assert_eq!(model.metadata_props[0].value, "fuzz");

        assert_eq!(model.encode_to_vec(), bytes);
    }

    #[test]
    fn test_built_node_matches_written_bytes() {
        let graph = GraphProto {
            node: vec![NodeProto::new("LeakyRelu", &["x"], &["y"]).with_attribute(AttributeProto::float("alpha", 0.5))],
            name: "leaky".to_string(),
            input: vec![ValueInfoProto::tensor("x", data_type::FLOAT, &[2])],
            output: vec![ValueInfoProto::tensor("y", data_type::FLOAT, &[2])],
            ..Default::default()
        };
        let mut model = ModelProto::new(graph, 13);
        model.producer_name.clear();
        model.graph.as_mut().unwrap().node[0].name.clear();
        model.metadata_props.push(StringStringEntryProto {
            key: "author".to_string(),
            value: "fuzz".to_string(),
        });
        assert_eq!(model.encode_to_vec(), leaky_relu_bytes());
    }

    #[test]
    fn test_optional_and_sparse_types_are_kept() {
        let mut graph = identity().graph.unwrap();
        graph.input.push(ValueInfoProto::optional("maybe", data_type::FLOAT, &[2]));
        graph.input.push(ValueInfoProto {
            name: "sparse".to_string(),
            r#type: Some(TypeProto {
                value: Some(type_proto::Value::SparseTensorType(type_proto::SparseTensor {
                    elem_type: data_type::FLOAT,
                    shape: None,
                })),
                denotation: String::new(),
            }),
            ..Default::default()
        });
        graph.sparse_initializer.push(SparseTensorProto {
            values: Some(TensorProto {
                dims: vec![1],
                data_type: data_type::FLOAT,
                float_data: vec![1.0],
                ..Default::default()
            }),
            indices: Some(TensorProto {
                dims: vec![1],
                data_type: data_type::INT64,
                int64_data: vec![3],
                ..Default::default()
            }),
            dims: vec![4],
        });
        let model = ModelProto::new(graph, 18);

        let decoded = ModelProto::from_bytes(&model.encode_to_vec()).unwrap();
        assert_eq!(decoded, model);
        let inputs = &decoded.graph.as_ref().unwrap().input;
        assert!(matches!(
            inputs[1].r#type.as_ref().unwrap().value,
            Some(type_proto::Value::OptionalType(_))
        ));
        assert!(matches!(
            inputs[2].r#type.as_ref().unwrap().value,
            Some(type_proto::Value::SparseTensorType(_))
        ));
    }

    #[test]
    fn test_garbage_does_not_decode_as_model() {
        assert!(ModelProto::from_bytes(&[0xff, 0xff, 0xff]).is_err());
    }
}
