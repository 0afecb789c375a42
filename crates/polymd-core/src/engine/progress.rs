use std::fmt;

/// The steps of preparing one polymer sample, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Setup,
    BuilderSetup,
    BuilderRun,
    Normalize,
    Cleanup,
    SimulationInputs,
    JobScript,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Setup => "Writing builder setup",
            Self::BuilderSetup => "Running builder setup",
            Self::BuilderRun => "Building structure",
            Self::Normalize => "Normalizing data file",
            Self::Cleanup => "Removing intermediates",
            Self::SimulationInputs => "Writing MD inputs",
            Self::JobScript => "Writing job script",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub enum Progress {
    BatchStart { total_samples: u64 },
    SampleStart { name: String },
    StageStart { sample: String, stage: Stage },
    SampleFinish { name: String, succeeded: bool },
    BatchFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
