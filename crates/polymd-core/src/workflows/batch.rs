use super::prepare::{self, PreparedSample};
use crate::core::chem::{MassCalculator, Rdkit};
use crate::core::models::polymer::PolymerSpec;
use crate::engine::config::{ConfigError, PrepareConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{error, info, instrument};

#[derive(Debug)]
pub struct SampleOutcome {
    pub name: String,
    pub result: Result<PreparedSample, EngineError>,
}

/// Per-sample outcomes, in the order the samples were given.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<SampleOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &PreparedSample> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &EngineError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.name.as_str(), e)))
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }
}

fn check_unique_names(samples: &[PolymerSpec]) -> Result<(), ConfigError> {
    let mut seen = HashSet::with_capacity(samples.len());
    for sample in samples {
        if !seen.insert(sample.name.as_str()) {
            return Err(ConfigError::Invalid {
                parameter: "name",
                reason: format!("sample name '{}' is used more than once", sample.name),
            });
        }
    }
    Ok(())
}

/// Prepares every sample under `config.output_root`.
///
/// A sample that fails is recorded in the report and the rest still run. Only a
/// problem with the batch as a whole, such as two samples sharing a directory, is
/// returned as an error. With `parallel` set the samples run on the rayon pool.
pub fn run(
    samples: &[PolymerSpec],
    config: &PrepareConfig,
    parallel: bool,
    reporter: &ProgressReporter,
) -> Result<BatchReport, EngineError> {
    run_with(samples, config, &Rdkit, parallel, reporter)
}

#[instrument(skip_all, name = "batch_workflow", fields(samples = samples.len()))]
pub fn run_with(
    samples: &[PolymerSpec],
    config: &PrepareConfig,
    masses: &dyn MassCalculator,
    parallel: bool,
    reporter: &ProgressReporter,
) -> Result<BatchReport, EngineError> {
    check_unique_names(samples)?;

    reporter.report(Progress::BatchStart {
        total_samples: samples.len() as u64,
    });

    let prepare_one = |polymer: &PolymerSpec| {
        reporter.report(Progress::SampleStart {
            name: polymer.name.clone(),
        });
        let result = prepare::run_with(polymer, config, masses, reporter);
        if let Err(e) = &result {
            error!("Sample '{}' failed: {}", polymer.name, e);
        }
        reporter.report(Progress::SampleFinish {
            name: polymer.name.clone(),
            succeeded: result.is_ok(),
        });
        SampleOutcome {
            name: polymer.name.clone(),
            result,
        }
    };

    let outcomes: Vec<SampleOutcome> = if parallel {
        samples.par_iter().map(prepare_one).collect()
    } else {
        samples.iter().map(prepare_one).collect()
    };

    reporter.report(Progress::BatchFinish);

    let report = BatchReport { outcomes };
    info!(
        "Batch complete: {} of {} sample(s) prepared.",
        report.outcomes.len() - report.failure_count(),
        report.outcomes.len()
    );
    Ok(report)
}
