mod common;

use {
    common::runtime,
    onnx::Value,
    prediction::render::{write_outputs, write_value},
};

fn rendered(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value).unwrap();
    out
}

#[test]
fn test_render_dispatches_on_element_type() {
    let onnx = runtime();
    assert_eq!(rendered(&Value::from_slice::<f32>(&onnx, &[3], &[1.5, -2.0, 0.0]).unwrap()), "[1.5, -2, 0]");
    assert_eq!(rendered(&Value::from_slice::<f64>(&onnx, &[2], &[0.125, 1e10]).unwrap()), "[0.125, 10000000000]");
    assert_eq!(rendered(&Value::from_slice::<i8>(&onnx, &[2], &[-128, 127]).unwrap()), "[-128, 127]");
    assert_eq!(rendered(&Value::from_slice::<u8>(&onnx, &[2], &[0, 255]).unwrap()), "[0, 255]");
    assert_eq!(rendered(&Value::from_slice::<i16>(&onnx, &[1], &[-300]).unwrap()), "[-300]");
    assert_eq!(rendered(&Value::from_slice::<u16>(&onnx, &[1], &[65535]).unwrap()), "[65535]");
    assert_eq!(rendered(&Value::from_slice::<i32>(&onnx, &[2], &[i32::MIN, 7]).unwrap()), "[-2147483648, 7]");
    assert_eq!(rendered(&Value::from_slice::<u32>(&onnx, &[1], &[u32::MAX]).unwrap()), "[4294967295]");
    assert_eq!(rendered(&Value::from_slice::<i64>(&onnx, &[1], &[-1]).unwrap()), "[-1]");
    assert_eq!(rendered(&Value::from_slice::<u64>(&onnx, &[1], &[u64::MAX]).unwrap()), "[18446744073709551615]");
}

#[test]
fn test_render_uses_shape_element_count() {
    let onnx = runtime();
    let matrix = Value::from_vec::<i32>(&onnx, &[2, 3], (0..6).collect()).unwrap();
    assert_eq!(rendered(&matrix), "[0, 1, 2, 3, 4, 5]");

    let scalar = Value::from_vec::<f32>(&onnx, &[], vec![4.0]).unwrap();
    assert_eq!(rendered(&scalar), "[4]");

    let empty = Value::from_vec::<f32>(&onnx, &[0, 3], Vec::new()).unwrap();
    assert_eq!(rendered(&empty), "[]");
}

#[test]
fn test_write_outputs_in_declared_order() {
    let onnx = runtime();
    let names = vec!["first".to_string(), "second".to_string(), "third".to_string()];
    let values = vec![
        Some(Value::from_slice::<i64>(&onnx, &[2], &[1, 2]).unwrap()),
        None,
        Some(Value::from_slice::<f32>(&onnx, &[1], &[0.5]).unwrap()),
    ];
    let mut out = String::new();
    write_outputs(&mut out, &names, &values).unwrap();
    assert_eq!(out, "first = [1, 2]\nsecond = <unset>\nthird = [0.5]\n");
}
