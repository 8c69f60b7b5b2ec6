//! Seeded random input data

use {
    crate::{MAX_ELEMENTS, PredictionError, PredictionSession, TensorBuffer, render},
    onnx::ElementType,
    rand::{Rng, SeedableRng, distributions::Standard, rngs::StdRng},
    rand_distr::StandardNormal,
    std::fmt,
};

/// `count` random elements of `element_type`, fully determined by `seed`
///
/// Floats are standard normal, 32-bit ints are uniform over the whole range.
/// Any other element type fails without producing data, as does a `count`
/// above [`MAX_ELEMENTS`].
pub fn generate(element_type: ElementType, count: usize, seed: u64) -> Result<TensorBuffer, PredictionError> {
    if count > MAX_ELEMENTS {
        return Err(PredictionError::TooManyElements { shape: vec![count] });
    }
    let rng = StdRng::seed_from_u64(seed);
    match element_type {
        ElementType::Float => Ok(TensorBuffer::Float(
            rng.sample_iter(StandardNormal).take(count).collect(),
        )),
        ElementType::Int32 => Ok(TensorBuffer::Int32(
            rng.sample_iter(Standard).take(count).collect(),
        )),
        other => Err(PredictionError::UnsupportedType(other)),
    }
}

/// Fills input slot `index` of a session
///
/// Implemented for closures of the same shape, so tests and fuzz drivers can swap
/// in replayed or adversarial data without touching the schema walk.
pub trait InputGenerator {
    fn generate(
        &mut self,
        session: &mut PredictionSession,
        index: usize,
        name: &str,
        element_type: ElementType,
        count: usize,
        seed: u64,
    ) -> Result<(), PredictionError>;
}

impl<F> InputGenerator for F
where
    F: FnMut(&mut PredictionSession, usize, &str, ElementType, usize, u64) -> Result<(), PredictionError>,
{
    fn generate(
        &mut self,
        session: &mut PredictionSession,
        index: usize,
        name: &str,
        element_type: ElementType,
        count: usize,
        seed: u64,
    ) -> Result<(), PredictionError> {
        self(session, index, name, element_type, count, seed)
    }
}

/// Default generator: [`generate`], log the data to `sink`, then set the input
pub struct RandomInputs<W: fmt::Write> {
    sink: W,
}

impl<W: fmt::Write> RandomInputs<W> {
    pub fn new(sink: W) -> Self {
        RandomInputs { sink }
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn into_sink(self) -> W {
        self.sink
    }
}

impl<W: fmt::Write> InputGenerator for RandomInputs<W> {
    fn generate(
        &mut self,
        session: &mut PredictionSession,
        index: usize,
        name: &str,
        element_type: ElementType,
        count: usize,
        seed: u64,
    ) -> Result<(), PredictionError> {
        let buffer = generate(element_type, count, seed)?;
        render::write_buffer(&mut self.sink, name, &buffer)?;
        session.set_input(index, buffer)
    }
}
