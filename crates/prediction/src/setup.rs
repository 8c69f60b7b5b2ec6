use {
    crate::{InputGenerator, PredictionError, PredictionSession},
    base::TEST_LOG_TARGET,
};

/// What one schema walk did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupSummary {
    /// Inputs handed to the generator, in order
    pub generated: Vec<usize>,
    /// Non-tensor inputs left unset
    pub skipped: Vec<usize>,
    /// Seed the next generated input would have received
    pub next_seed: u64,
}

impl PredictionSession {
    /// Walk the declared inputs and let `generator` fill each dense tensor
    ///
    /// The seed goes up by one after every generated input. Skipped inputs do not
    /// consume a seed. Generator errors stop the walk.
    pub fn setup_input<G: InputGenerator + ?Sized>(
        &mut self,
        generator: &mut G,
        seed: u64,
    ) -> Result<SetupSummary, PredictionError> {
        log::info!(target: TEST_LOG_TARGET, "input data:");
        let mut summary = SetupSummary {
            next_seed: seed,
            ..Default::default()
        };

        for index in 0..self.input_count() {
            match self.tensor_input(index) {
                Ok(spec) => {
                    let name = self.input_names()[index].clone();
                    generator.generate(
                        self,
                        index,
                        &name,
                        spec.element_type,
                        spec.element_count()?,
                        summary.next_seed,
                    )?;
                    summary.next_seed = summary.next_seed.wrapping_add(1);
                    summary.generated.push(index);
                }
                Err(PredictionError::UnsupportedInputKind { kind, .. }) => {
                    log::warn!(
                        target: TEST_LOG_TARGET,
                        "Unsupported input {} '{}': {}",
                        index,
                        self.input_names()[index],
                        kind
                    );
                    summary.skipped.push(index);
                }
                Err(err) => return Err(err),
            }
        }

        Ok(summary)
    }
}
