use super::external::ToolCommand;
use crate::core::models::job::JobParams;
use crate::core::models::polymer::{BuildOptions, PolymerSpec};
use crate::core::models::simulation::{EquilibrationStage, SimulationParams, default_protocol};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {parameter}: {reason}")]
    Invalid {
        parameter: &'static str,
        reason: String,
    },
}

fn invalid(parameter: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        parameter,
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub emc_setup: ToolCommand,
    pub emc_exec: ToolCommand,
    /// Treat a failing external tool as an error instead of logging and continuing.
    pub strict: bool,
}

/// Everything shared by the samples of one preparation batch.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepareConfig {
    /// Each sample is prepared in `<output_root>/<sample name>`.
    pub output_root: PathBuf,
    pub build: BuildOptions,
    pub simulation: SimulationParams,
    pub job: JobParams,
    pub tools: ToolConfig,
}

impl PrepareConfig {
    pub fn sample_dir(&self, name: &str) -> PathBuf {
        self.output_root.join(name)
    }
}

#[derive(Default)]
pub struct PrepareConfigBuilder {
    output_root: Option<PathBuf>,
    build: Option<BuildOptions>,
    emc_setup: Option<ToolCommand>,
    emc_exec: Option<ToolCommand>,
    strict: Option<bool>,
    t_init: Option<f64>,
    t_final: Option<f64>,
    t_interval: Option<f64>,
    production_steps: Option<u64>,
    potential_path: Option<String>,
    pair_style: Option<String>,
    elements: Option<String>,
    protocol: Option<Vec<EquilibrationStage>>,
    project: Option<String>,
    queue: Option<String>,
    nodes: Option<u32>,
    ppn: Option<u32>,
    walltime: Option<String>,
    lammps_exec: Option<String>,
}

impl PrepareConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_root(mut self, path: PathBuf) -> Self {
        self.output_root = Some(path);
        self
    }
    pub fn build_options(mut self, build: BuildOptions) -> Self {
        self.build = Some(build);
        self
    }
    pub fn emc_setup(mut self, tool: ToolCommand) -> Self {
        self.emc_setup = Some(tool);
        self
    }
    pub fn emc_exec(mut self, tool: ToolCommand) -> Self {
        self.emc_exec = Some(tool);
        self
    }
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }
    pub fn t_init(mut self, kelvin: f64) -> Self {
        self.t_init = Some(kelvin);
        self
    }
    pub fn t_final(mut self, kelvin: f64) -> Self {
        self.t_final = Some(kelvin);
        self
    }
    pub fn t_interval(mut self, kelvin: f64) -> Self {
        self.t_interval = Some(kelvin);
        self
    }
    pub fn production_steps(mut self, steps: u64) -> Self {
        self.production_steps = Some(steps);
        self
    }
    pub fn potential_path(mut self, path: String) -> Self {
        self.potential_path = Some(path);
        self
    }
    pub fn pair_style(mut self, style: String) -> Self {
        self.pair_style = Some(style);
        self
    }
    pub fn elements(mut self, elements: String) -> Self {
        self.elements = Some(elements);
        self
    }
    pub fn protocol(mut self, stages: Vec<EquilibrationStage>) -> Self {
        self.protocol = Some(stages);
        self
    }
    pub fn project(mut self, project: String) -> Self {
        self.project = Some(project);
        self
    }
    pub fn queue(mut self, queue: String) -> Self {
        self.queue = Some(queue);
        self
    }
    pub fn nodes(mut self, n: u32) -> Self {
        self.nodes = Some(n);
        self
    }
    pub fn ppn(mut self, n: u32) -> Self {
        self.ppn = Some(n);
        self
    }
    pub fn walltime(mut self, walltime: String) -> Self {
        self.walltime = Some(walltime);
        self
    }
    pub fn lammps_exec(mut self, exec: String) -> Self {
        self.lammps_exec = Some(exec);
        self
    }

    pub fn build(self) -> Result<PrepareConfig, ConfigError> {
        let build = self.build.unwrap_or_default();
        if build.output_prefix.trim().is_empty() {
            return Err(invalid("output_prefix", "must not be empty"));
        }

        let tools = ToolConfig {
            emc_setup: self
                .emc_setup
                .ok_or(ConfigError::MissingParameter("emc_setup"))?,
            emc_exec: self
                .emc_exec
                .ok_or(ConfigError::MissingParameter("emc_exec"))?,
            strict: self.strict.unwrap_or(false),
        };

        let t_init = self.t_init.ok_or(ConfigError::MissingParameter("t_init"))?;
        let t_final = self
            .t_final
            .ok_or(ConfigError::MissingParameter("t_final"))?;
        let t_interval = self
            .t_interval
            .ok_or(ConfigError::MissingParameter("t_interval"))?;
        if !(t_interval > 0.0) {
            return Err(invalid("t_interval", "must be positive"));
        }
        if t_init < t_final {
            return Err(invalid(
                "t_init",
                format!("{} K is below the final temperature {} K", t_init, t_final),
            ));
        }
        let production_steps = self
            .production_steps
            .ok_or(ConfigError::MissingParameter("production_steps"))?;
        if production_steps == 0 {
            return Err(invalid("production_steps", "must be at least 1"));
        }
        let protocol = self.protocol.unwrap_or_else(|| default_protocol(t_init));

        let simulation = SimulationParams {
            t_init,
            t_final,
            t_interval,
            production_steps,
            potential_path: self
                .potential_path
                .ok_or(ConfigError::MissingParameter("potential_path"))?,
            pair_style: self
                .pair_style
                .ok_or(ConfigError::MissingParameter("pair_style"))?,
            elements: self
                .elements
                .ok_or(ConfigError::MissingParameter("elements"))?,
            datafile_prefix: build.output_prefix.clone(),
            protocol,
        };

        let job = JobParams {
            project: self
                .project
                .ok_or(ConfigError::MissingParameter("project"))?,
            queue: self.queue.ok_or(ConfigError::MissingParameter("queue"))?,
            nodes: self.nodes.ok_or(ConfigError::MissingParameter("nodes"))?,
            ppn: self.ppn.ok_or(ConfigError::MissingParameter("ppn"))?,
            walltime: self
                .walltime
                .ok_or(ConfigError::MissingParameter("walltime"))?,
            lammps_exec: self
                .lammps_exec
                .ok_or(ConfigError::MissingParameter("lammps_exec"))?,
        };
        if job.nodes == 0 || job.ppn == 0 {
            return Err(invalid("nodes/ppn", "must request at least one processor"));
        }

        Ok(PrepareConfig {
            output_root: self
                .output_root
                .ok_or(ConfigError::MissingParameter("output_root"))?,
            build,
            simulation,
            job,
            tools,
        })
    }
}

/// Checks one sample's parameters before any file is written for it.
pub fn validate_polymer(polymer: &PolymerSpec) -> Result<(), ConfigError> {
    if polymer.smiles.trim().is_empty() {
        return Err(invalid("smiles", "must not be empty"));
    }
    if polymer.name.trim().is_empty() {
        return Err(invalid("name", "must not be empty"));
    }
    if polymer.name.contains(['/', '\\']) || polymer.name == "." || polymer.name == ".." {
        return Err(invalid(
            "name",
            format!("'{}' is not a valid directory name", polymer.name),
        ));
    }
    if !(polymer.molecular_weight > 0.0) || !polymer.molecular_weight.is_finite() {
        return Err(invalid("molecular_weight", "must be a positive number"));
    }
    if polymer.total_atoms == 0 {
        return Err(invalid("total_atoms", "must be at least 1"));
    }
    if !(polymer.density > 0.0) || !polymer.density.is_finite() {
        return Err(invalid("density", "must be a positive number"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_builder() -> PrepareConfigBuilder {
        PrepareConfigBuilder::new()
            .output_root(PathBuf::from("runs"))
            .emc_setup(ToolCommand::parse("emc_setup.pl").unwrap())
            .emc_exec(ToolCommand::parse("emc_linux64").unwrap())
            .t_init(600.0)
            .t_final(100.0)
            .t_interval(25.0)
            .production_steps(1_000_000)
            .potential_path("potential_saved".to_string())
            .pair_style("nn".to_string())
            .elements("C H".to_string())
            .project("GT-proj".to_string())
            .queue("inferno".to_string())
            .nodes(2)
            .ppn(24)
            .walltime("48:00:00".to_string())
            .lammps_exec("lmp".to_string())
    }

    fn polymer() -> PolymerSpec {
        PolymerSpec {
            name: "pe".to_string(),
            smiles: "*CC*".to_string(),
            molecular_weight: 10000.0,
            total_atoms: 20000,
            density: 0.8,
        }
    }

    #[test]
    fn build_fills_defaults_and_links_data_file_prefix() {
        let config = complete_builder().build().unwrap();
        assert_eq!(config.build, BuildOptions::default());
        assert!(!config.tools.strict);
        assert_eq!(config.simulation.datafile_prefix, "system");
        assert_eq!(config.simulation.protocol, default_protocol(600.0));
        assert_eq!(config.sample_dir("pe"), PathBuf::from("runs/pe"));
    }

    #[test]
    fn build_reports_missing_parameters() {
        let err = PrepareConfigBuilder::new()
            .output_root(PathBuf::from("runs"))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("emc_setup"));

        let err = PrepareConfigBuilder {
            lammps_exec: None,
            ..complete_builder()
        }
        .build()
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("lammps_exec"));
    }

    #[test]
    fn build_rejects_inconsistent_temperature_ramp() {
        let err = complete_builder().t_interval(0.0).build().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { parameter: "t_interval", .. }));

        let err = complete_builder().t_final(700.0).build().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { parameter: "t_init", .. }));
    }

    #[test]
    fn build_rejects_zero_processors() {
        let err = complete_builder().ppn(0).build().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { parameter: "nodes/ppn", .. }));
    }

    #[test]
    fn custom_protocol_overrides_default() {
        let stages = vec![EquilibrationStage::Nvt {
            steps: 100,
            temperature: 300.0,
        }];
        let config = complete_builder().protocol(stages.clone()).build().unwrap();
        assert_eq!(config.simulation.protocol, stages);
    }

    #[test]
    fn validate_polymer_accepts_well_formed_sample() {
        assert_eq!(validate_polymer(&polymer()), Ok(()));
    }

    #[test]
    fn validate_polymer_rejects_bad_values() {
        let cases = [
            PolymerSpec {
                smiles: " ".to_string(),
                ..polymer()
            },
            PolymerSpec {
                name: "a/b".to_string(),
                ..polymer()
            },
            PolymerSpec {
                molecular_weight: 0.0,
                ..polymer()
            },
            PolymerSpec {
                total_atoms: 0,
                ..polymer()
            },
            PolymerSpec {
                density: f64::NAN,
                ..polymer()
            },
        ];
        for case in cases {
            assert!(validate_polymer(&case).is_err(), "{case:?} should be rejected");
        }
    }
}
