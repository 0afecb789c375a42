use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileToolsConfig};
use super::models::AppConfig;
use crate::cli::PrepareArgs;
use crate::error::{CliError, Result};
use polymd::core::models::polymer::{BuildOptions, PolymerSpec};
use polymd::engine::config as core_config;
use polymd::engine::external::{EMC_EXEC_ENV, EMC_SETUP_ENV, ToolCommand};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

pub fn build_config(args: &PrepareArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = FileConfig::from_file(&args.config)?;
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let output_root = args
        .output_root
        .clone()
        .or(file_config.output_root.take())
        .unwrap_or_else(|| PathBuf::from(defaults.output_root));

    let build_file = file_config.build.take().unwrap_or_default();
    let base = BuildOptions::default();
    let build = BuildOptions {
        forcefield: build_file.forcefield.unwrap_or(base.forcefield),
        terminator: build_file.terminator.unwrap_or(base.terminator),
        output_prefix: build_file.output_prefix.unwrap_or(base.output_prefix),
        cleanup: !args.no_cleanup && build_file.cleanup.unwrap_or(base.cleanup),
    };

    let tools_file = file_config.tools.take().unwrap_or_default();
    let (emc_setup, emc_exec) = resolve_tools(&tools_file)?;
    let strict = args.strict || tools_file.strict.unwrap_or(false);

    let sim_file = file_config.simulation.take().unwrap_or_default();
    let potential = sim_file.potential.ok_or_else(|| {
        CliError::Config("`simulation.potential` is required.".to_string())
    })?;

    let job_file = file_config.job.take().unwrap_or_default();

    let mut builder = core_config::PrepareConfigBuilder::new()
        .output_root(output_root)
        .build_options(build)
        .emc_setup(emc_setup)
        .emc_exec(emc_exec)
        .strict(strict)
        .t_init(sim_file.t_init.unwrap_or(defaults.t_init))
        .t_final(sim_file.t_final.unwrap_or(defaults.t_final))
        .t_interval(sim_file.t_interval.unwrap_or(defaults.t_interval))
        .production_steps(
            sim_file
                .production_steps
                .unwrap_or(defaults.production_steps),
        )
        .potential_path(potential)
        .pair_style(
            sim_file
                .pair_style
                .unwrap_or_else(|| defaults.pair_style.to_string()),
        )
        .elements(
            sim_file
                .elements
                .unwrap_or_else(|| defaults.elements.to_string()),
        )
        .project(
            job_file
                .project
                .unwrap_or_else(|| defaults.project.to_string()),
        )
        .queue(job_file.queue.unwrap_or_else(|| defaults.queue.to_string()))
        .nodes(job_file.nodes.unwrap_or(defaults.nodes))
        .ppn(job_file.ppn.unwrap_or(defaults.ppn))
        .walltime(
            job_file
                .walltime
                .unwrap_or_else(|| defaults.walltime.to_string()),
        )
        .lammps_exec(
            job_file
                .lammps_exec
                .unwrap_or_else(|| defaults.lammps_exec.to_string()),
        );
    if let Some(protocol) = sim_file.protocol {
        builder = builder.protocol(protocol);
    }

    let core_config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let samples = select_samples(
        file_config.polymers.into_iter().map(Into::into).collect(),
        &args.smiles,
    )?;

    Ok(AppConfig {
        samples,
        core_config,
    })
}

fn resolve_tool(configured: Option<&str>, env_var: &str, key: &str) -> Result<ToolCommand> {
    let parsed = match configured {
        Some(command) => Some(ToolCommand::parse(command)),
        None => ToolCommand::from_env(env_var),
    };
    match parsed {
        Some(tool) => tool.map_err(|e| CliError::Config(format!("`{}`: {}", key, e))),
        None => Err(CliError::Config(format!(
            "`{}` is required in the config file or via the {} environment variable.",
            key, env_var
        ))),
    }
}

fn resolve_tools(file: &FileToolsConfig) -> Result<(ToolCommand, ToolCommand)> {
    let setup = resolve_tool(file.emc_setup.as_deref(), EMC_SETUP_ENV, "tools.emc-setup")?;
    let exec = resolve_tool(file.emc_exec.as_deref(), EMC_EXEC_ENV, "tools.emc-exec")?;
    debug!("Builder setup: {:?}; builder: {:?}", setup, exec);
    Ok((setup, exec))
}

/// Keeps only the polymers whose SMILES was requested on the command line.
/// Every requested SMILES must match a configured polymer.
fn select_samples(samples: Vec<PolymerSpec>, requested: &[String]) -> Result<Vec<PolymerSpec>> {
    if samples.is_empty() {
        return Err(CliError::Config(
            "At least one `[[polymers]]` entry is required.".to_string(),
        ));
    }
    if requested.is_empty() {
        return Ok(samples);
    }
    if let Some(missing) = requested
        .iter()
        .find(|smiles| !samples.iter().any(|s| &s.smiles == *smiles))
    {
        return Err(CliError::Argument(format!(
            "No configured polymer has repeat unit '{}'",
            missing
        )));
    }
    Ok(samples
        .into_iter()
        .filter(|s| requested.contains(&s.smiles))
        .collect())
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let text = || value_str.to_string();

        match key {
            "output-root" => config.output_root = Some(PathBuf::from(value_str)),
            "build.forcefield" => {
                config.build.get_or_insert_with(Default::default).forcefield = Some(text())
            }
            "build.terminator" => {
                config.build.get_or_insert_with(Default::default).terminator = Some(text())
            }
            "build.output-prefix" => {
                config.build.get_or_insert_with(Default::default).output_prefix = Some(text())
            }
            "build.cleanup" => {
                config.build.get_or_insert_with(Default::default).cleanup =
                    Some(parse_value(key, value_str, "boolean")?)
            }
            "tools.emc-setup" => {
                config.tools.get_or_insert_with(Default::default).emc_setup = Some(text())
            }
            "tools.emc-exec" => {
                config.tools.get_or_insert_with(Default::default).emc_exec = Some(text())
            }
            "tools.strict" => {
                config.tools.get_or_insert_with(Default::default).strict =
                    Some(parse_value(key, value_str, "boolean")?)
            }
            "simulation.t-init" => {
                config.simulation.get_or_insert_with(Default::default).t_init =
                    Some(parse_value(key, value_str, "float")?)
            }
            "simulation.t-final" => {
                config.simulation.get_or_insert_with(Default::default).t_final =
                    Some(parse_value(key, value_str, "float")?)
            }
            "simulation.t-interval" => {
                config.simulation.get_or_insert_with(Default::default).t_interval =
                    Some(parse_value(key, value_str, "float")?)
            }
            "simulation.production-steps" => {
                config
                    .simulation
                    .get_or_insert_with(Default::default)
                    .production_steps = Some(parse_value(key, value_str, "integer")?)
            }
            "simulation.potential" => {
                config.simulation.get_or_insert_with(Default::default).potential = Some(text())
            }
            "simulation.pair-style" => {
                config.simulation.get_or_insert_with(Default::default).pair_style = Some(text())
            }
            "simulation.elements" => {
                config.simulation.get_or_insert_with(Default::default).elements = Some(text())
            }
            "job.project" => config.job.get_or_insert_with(Default::default).project = Some(text()),
            "job.queue" => config.job.get_or_insert_with(Default::default).queue = Some(text()),
            "job.nodes" => {
                config.job.get_or_insert_with(Default::default).nodes =
                    Some(parse_value(key, value_str, "integer")?)
            }
            "job.ppn" => {
                config.job.get_or_insert_with(Default::default).ppn =
                    Some(parse_value(key, value_str, "integer")?)
            }
            "job.walltime" => {
                config.job.get_or_insert_with(Default::default).walltime = Some(text())
            }
            "job.lammps-exec" => {
                config.job.get_or_insert_with(Default::default).lammps_exec = Some(text())
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use polymd::core::models::simulation::{EquilibrationStage, default_protocol};
    use std::fs;
    use std::path::Path;
    use tempfile::{TempDir, tempdir};

    static TEST_DIR: Lazy<TempDir> = Lazy::new(|| tempdir().expect("Failed to create temp dir"));

    const BASE_CONFIG: &str = r#"
output-root = "runs"

[tools]
emc-setup = "perl /opt/emc/emc_setup.pl"
emc-exec = "/opt/emc/emc_linux64"

[simulation]
potential = "~/NNMD/potential_saved"

[[polymers]]
smiles = "*CC*"
molecular-weight = 10000.0
total-atoms = 3000
density = 0.5

[[polymers]]
name = "pp"
smiles = "*CC(*)C"
molecular-weight = 10000.0
total-atoms = 3000
density = 0.5
"#;

    fn write_config_file(name: &str, content: &str) -> PathBuf {
        let file_path = TEST_DIR.path().join(name);
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn base_prepare_args(config: &Path) -> PrepareArgs {
        PrepareArgs {
            config: config.to_path_buf(),
            output_root: None,
            smiles: vec![],
            no_cleanup: false,
            strict: false,
            set_values: vec![],
        }
    }

    #[test]
    fn build_config_fills_defaults_for_missing_values() {
        let path = write_config_file("defaults.toml", BASE_CONFIG);
        let app = build_config(&base_prepare_args(&path)).unwrap();
        let cfg = app.core_config;

        assert_eq!(cfg.output_root, PathBuf::from("runs"));
        assert_eq!(cfg.build, BuildOptions::default());
        assert_eq!(cfg.tools.emc_setup.program(), "perl");
        assert!(!cfg.tools.strict);
        assert_eq!(cfg.simulation.t_init, 600.0);
        assert_eq!(cfg.simulation.t_final, 100.0);
        assert_eq!(cfg.simulation.t_interval, 25.0);
        assert_eq!(cfg.simulation.production_steps, 1_000_000);
        assert_eq!(cfg.simulation.protocol, default_protocol(600.0));
        assert_eq!(cfg.job.queue, "inferno");
        assert_eq!(cfg.job.total_processes(), 48);

        let names: Vec<&str> = app.samples.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["*CC*", "pp"]);
    }

    #[test]
    fn cli_flags_override_file_values() {
        let content = format!("{}\n[build]\ncleanup = true\n", BASE_CONFIG);
        let path = write_config_file("override.toml", &content);
        let mut args = base_prepare_args(&path);
        args.output_root = Some(PathBuf::from("elsewhere"));
        args.no_cleanup = true;
        args.strict = true;

        let cfg = build_config(&args).unwrap().core_config;

        assert_eq!(cfg.output_root, PathBuf::from("elsewhere"));
        assert!(!cfg.build.cleanup);
        assert!(cfg.tools.strict);
    }

    #[test]
    fn set_values_override_file_and_defaults() {
        let path = write_config_file("set.toml", BASE_CONFIG);
        let mut args = base_prepare_args(&path);
        args.set_values = vec![
            "simulation.t-init=500".to_string(),
            "job.nodes=4".to_string(),
            "build.output-prefix=melt".to_string(),
        ];

        let cfg = build_config(&args).unwrap().core_config;

        assert_eq!(cfg.simulation.t_init, 500.0);
        assert_eq!(cfg.simulation.protocol, default_protocol(500.0));
        assert_eq!(cfg.simulation.datafile_prefix, "melt");
        assert_eq!(cfg.job.nodes, 4);
    }

    #[test]
    fn set_values_reject_bad_input() {
        let path = write_config_file("set_bad.toml", BASE_CONFIG);
        for bad in ["job.nodes=many", "unknown.key=1", "no-equals-sign"] {
            let mut args = base_prepare_args(&path);
            args.set_values = vec![bad.to_string()];
            assert!(
                matches!(build_config(&args), Err(CliError::Config(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn custom_protocol_is_taken_from_file() {
        let content = BASE_CONFIG.replace(
            "potential = \"~/NNMD/potential_saved\"\n",
            "potential = \"p\"\n\n[[simulation.protocol]]\nensemble = \"nvt\"\nsteps = 10\ntemperature = 300.0\n",
        );
        let path = write_config_file("protocol.toml", &content);

        let cfg = build_config(&base_prepare_args(&path)).unwrap().core_config;

        assert_eq!(
            cfg.simulation.protocol,
            vec![EquilibrationStage::Nvt {
                steps: 10,
                temperature: 300.0
            }]
        );
    }

    #[test]
    fn smiles_filter_selects_configured_polymers() {
        let path = write_config_file("filter.toml", BASE_CONFIG);
        let mut args = base_prepare_args(&path);
        args.smiles = vec!["*CC(*)C".to_string()];

        let app = build_config(&args).unwrap();
        assert_eq!(app.samples.len(), 1);
        assert_eq!(app.samples[0].name, "pp");

        args.smiles = vec!["*C(*)Cl".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Argument(_))));
    }

    #[test]
    fn missing_potential_returns_config_error() {
        let content = BASE_CONFIG.replace("potential = \"~/NNMD/potential_saved\"", "");
        let path = write_config_file("missing.toml", &content);

        let result = build_config(&base_prepare_args(&path));
        assert!(matches!(result, Err(CliError::Config(ref msg)) if msg.contains("potential")));
    }

    #[test]
    fn invalid_core_values_surface_as_config_errors() {
        let path = write_config_file("invalid.toml", BASE_CONFIG);
        let mut args = base_prepare_args(&path);
        args.set_values = vec!["simulation.t-interval=0".to_string()];

        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }
}
