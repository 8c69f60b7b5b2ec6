mod common;

use {
    common::*,
    onnx::ElementType,
    prediction::{
        PredictionError, PredictionSession, RandomInputs, SetupSummary, generate,
    },
};

#[derive(Debug, Clone, PartialEq)]
struct Call {
    index: usize,
    name: String,
    element_type: ElementType,
    count: usize,
    seed: u64,
}

#[test]
fn test_each_tensor_input_gets_the_next_seed() {
    let onnx = runtime();
    let mut session = PredictionSession::from_description(&onnx, &float_and_int_model()).unwrap();

    let mut calls = Vec::new();
    let mut recorder = |session: &mut PredictionSession,
                        index: usize,
                        name: &str,
                        element_type: ElementType,
                        count: usize,
                        seed: u64|
     -> Result<(), PredictionError> {
        calls.push(Call {
            index,
            name: name.to_string(),
            element_type,
            count,
            seed,
        });
        session.set_input(index, generate(element_type, count, seed)?)
    };
    let summary = session.setup_input(&mut recorder, 100).unwrap();

    assert_eq!(
        calls,
        vec![
            Call {
                index: 0,
                name: "f".to_string(),
                element_type: ElementType::Float,
                count: 4,
                seed: 100,
            },
            Call {
                index: 1,
                name: "i".to_string(),
                element_type: ElementType::Int32,
                count: 3,
                seed: 101,
            },
        ]
    );
    assert_eq!(
        summary,
        SetupSummary {
            generated: vec![0, 1],
            skipped: vec![],
            next_seed: 102,
        }
    );
    assert!(session.input(0).is_some());
    assert!(session.input(1).is_some());
    session.run_inference().unwrap();
}

#[test]
fn test_non_tensor_input_is_skipped_without_consuming_a_seed() {
    let onnx = runtime();
    let mut session = PredictionSession::from_description(&onnx, &sequence_and_tensor_model()).unwrap();

    let mut seen = Vec::new();
    let mut recorder = |_: &mut PredictionSession,
                        index: usize,
                        _: &str,
                        _: ElementType,
                        _: usize,
                        seed: u64|
     -> Result<(), PredictionError> {
        seen.push((index, seed));
        Ok(())
    };
    let summary = session.setup_input(&mut recorder, 7).unwrap();

    assert_eq!(seen, vec![(1, 7)]);
    assert_eq!(summary.generated, vec![1]);
    assert_eq!(summary.skipped, vec![0]);
    assert_eq!(summary.next_seed, 8);
}

#[test]
fn test_random_inputs_log_generated_data() {
    let onnx = runtime();
    let mut session = PredictionSession::from_description(&onnx, &float_and_int_model()).unwrap();
    let mut generator = RandomInputs::new(String::new());
    session.setup_input(&mut generator, 0).unwrap();

    let log = generator.into_sink();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("f = ["));
    assert!(lines[1].starts_with("i = ["));
    assert_eq!(lines[0].matches(", ").count(), 3);
    assert_eq!(lines[1].matches(", ").count(), 2);
    assert_eq!(lines[0], format!("f = {}", generate(ElementType::Float, 4, 0).unwrap()));
    assert_eq!(lines[1], format!("i = {}", generate(ElementType::Int32, 3, 1).unwrap()));
}

#[test]
fn test_same_seed_reproduces_inputs() {
    let onnx = runtime();
    let render = |seed: u64| {
        let mut session = PredictionSession::from_description(&onnx, &add_model()).unwrap();
        let mut generator = RandomInputs::new(String::new());
        session.setup_input(&mut generator, seed).unwrap();
        session.run_inference().unwrap();
        (generator.into_sink(), session.to_string())
    };
    assert_eq!(render(3), render(3));
    assert_ne!(render(3).0, render(4).0);
}

#[test]
fn test_unsupported_element_type_stops_setup() {
    let onnx = runtime();
    let mut session = PredictionSession::from_description(&onnx, &int64_model()).unwrap();
    let mut generator = RandomInputs::new(String::new());
    let result = session.setup_input(&mut generator, 0);

    assert!(matches!(result, Err(PredictionError::UnsupportedType(ElementType::Int64))));
    assert!(session.input(0).is_none());
    assert!(generator.sink().is_empty());
}

#[test]
fn test_generator_error_stops_walk() {
    let onnx = runtime();
    let mut session = PredictionSession::from_description(&onnx, &add_model()).unwrap();

    let mut calls = 0;
    let mut failing = |_: &mut PredictionSession,
                       _: usize,
                       _: &str,
                       element_type: ElementType,
                       _: usize,
                       _: u64|
     -> Result<(), PredictionError> {
        calls += 1;
        Err(PredictionError::UnsupportedType(element_type))
    };
    assert!(session.setup_input(&mut failing, 0).is_err());
    assert_eq!(calls, 1);
}

#[test]
fn test_seed_wraps() {
    let onnx = runtime();
    let mut session = PredictionSession::from_description(&onnx, &add_model()).unwrap();
    let summary = session
        .setup_input(&mut RandomInputs::new(String::new()), u64::MAX)
        .unwrap();
    assert_eq!(summary.next_seed, 1);
}

#[test]
fn test_huge_declared_shape_stops_setup_without_generating() {
    let onnx = runtime();
    let model = identity_with_dims(&[1 << 40, 1 << 40]);
    let mut session = PredictionSession::from_description(&onnx, &model).unwrap();

    let mut called = false;
    let mut generator = |_: &mut PredictionSession,
                         _: usize,
                         _: &str,
                         _: ElementType,
                         _: usize,
                         _: u64|
     -> Result<(), PredictionError> {
        called = true;
        Ok(())
    };
    let err = session.setup_input(&mut generator, 0).unwrap_err();
    assert!(matches!(err, PredictionError::TooManyElements { .. }));
    assert!(!called);
    assert!(session.input(0).is_none());
}
