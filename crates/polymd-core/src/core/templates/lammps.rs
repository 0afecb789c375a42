use super::{format_float, render_to_path};
use crate::core::models::simulation::{EquilibrationStage, P_INIT_ATM, SimulationParams};
use std::io::{self, Write};
use std::path::Path;

pub const SETTINGS_FILE_NAME: &str = "system.in.settings";
pub const INPUT_FILE_NAME: &str = "lmp.in";

const NEIGHBOR_SKIN: f64 = 2.0;
const NEIGHBOR_EVERY: u32 = 1;
const TIMESTEP_FS: u32 = 1;
const THERMO_EVERY: u32 = 1000;
const DUMP_EVERY: u32 = 10000;
const T_DAMP: u32 = 100;
const P_DAMP: u32 = 1000;
const DENSITY_SAMPLE_EVERY: u64 = 100;

fn command(writer: &mut impl Write, keyword: &str, args: impl std::fmt::Display) -> io::Result<()> {
    writeln!(writer, "{:<15} {}", keyword, args)
}

/// Writes the force-field and run-control settings included by the input script.
pub fn write_settings(sim: &SimulationParams, writer: &mut impl Write) -> io::Result<()> {
    command(writer, "pair_style", &sim.pair_style)?;
    command(
        writer,
        "pair_coeff",
        format_args!("* * {} {}", sim.potential_path, sim.elements),
    )?;
    writeln!(writer)?;
    command(writer, "neighbor", format_args!("{} bin", format_float(NEIGHBOR_SKIN)))?;
    command(
        writer,
        "neigh_modify",
        format_args!("delay 0 every {} check yes", NEIGHBOR_EVERY),
    )?;
    writeln!(writer)?;
    command(
        writer,
        "thermo_style",
        "custom step temp density vol press ke pe ebond evdwl ecoul elong",
    )?;
    command(writer, "thermo", THERMO_EVERY)?;
    command(writer, "timestep", TIMESTEP_FS)?;
    Ok(())
}

/// Writes the MD input script: minimization, the staged equilibration protocol,
/// and a production loop that cools from `t_init` to `t_final` recording density.
pub fn write_input(sim: &SimulationParams, writer: &mut impl Write) -> io::Result<()> {
    writeln!(
        writer,
        "# LAMMPS input file generated by high-throughput Polymer MD generator"
    )?;
    writeln!(writer)?;

    writeln!(writer, "### Initialization")?;
    command(writer, "atom_style", "full")?;
    command(writer, "units", "real")?;
    command(writer, "read_data", format_args!("{}.data", sim.datafile_prefix))?;
    command(writer, "include", SETTINGS_FILE_NAME)?;
    writeln!(writer)?;
    writeln!(writer)?;

    writeln!(writer, "### Minimization")?;
    command(writer, "min_style", "cg")?;
    command(writer, "minimize", "1.0e-6 1.0e-8 100000 10000000")?;
    command(writer, "reset_timestep", 0)?;
    writeln!(writer)?;
    writeln!(writer)?;

    write_equilibration(sim, writer)?;
    write_production(sim, writer)?;
    Ok(())
}

fn write_equilibration(sim: &SimulationParams, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "### Equilibration")?;
    command(
        writer,
        "dump",
        format_args!(
            "dump1 all custom {} equil.lammpstrj id mol type q xs ys zs ix iy iz",
            DUMP_EVERY
        ),
    )?;
    command(
        writer,
        "restart",
        format_args!("{} equilibrated.restart", sim.equilibration_steps()),
    )?;
    writeln!(writer)?;

    for (i, stage) in sim.protocol.iter().enumerate() {
        let fix_id = format!("step{}", i + 1);
        match *stage {
            EquilibrationStage::Nvt { temperature, .. } => command(
                writer,
                "fix",
                format_args!(
                    "{} all nvt temp {} {} {}",
                    fix_id, temperature, temperature, T_DAMP
                ),
            )?,
            EquilibrationStage::Npt {
                temperature,
                pressure,
                ..
            } => command(
                writer,
                "fix",
                format_args!(
                    "{} all npt temp {} {} {} iso {} {} {}",
                    fix_id, temperature, temperature, T_DAMP, pressure, pressure, P_DAMP
                ),
            )?,
        }
        command(writer, "run", stage.steps())?;
        command(writer, "unfix", &fix_id)?;
        writeln!(writer)?;
    }
    command(writer, "undump", "dump1")?;
    command(writer, "reset_timestep", 0)?;
    writeln!(writer)?;
    writeln!(writer)?;
    Ok(())
}

fn write_production(sim: &SimulationParams, writer: &mut impl Write) -> io::Result<()> {
    let steps = sim.production_steps;

    writeln!(writer, "### Production")?;
    command(
        writer,
        "dump",
        format_args!(
            "dump2 all custom {} production.lammpstrj id mol type q xs ys zs ix iy iz",
            DUMP_EVERY
        ),
    )?;
    command(writer, "restart", format_args!("{} production.restart", steps))?;
    command(writer, "variable", "Rho equal density")?;
    command(writer, "variable", "Temp equal temp")?;
    command(
        writer,
        "fix",
        format_args!(
            "fDENS all ave/time {} {} {} v_Temp v_Rho file temp_vs_density",
            steps / DENSITY_SAMPLE_EVERY / 4,
            DENSITY_SAMPLE_EVERY,
            steps
        ),
    )?;
    writeln!(writer)?;

    command(writer, "label", "loop")?;
    command(
        writer,
        "variable",
        format_args!("a loop {}", sim.temperature_points()),
    )?;
    command(
        writer,
        "variable",
        format_args!("b equal {}-{}*($a-1)", sim.t_init, sim.t_interval),
    )?;
    command(
        writer,
        "fix",
        format_args!(
            "fNPT all npt temp $b $b {} iso {} {} {}",
            T_DAMP, P_INIT_ATM, P_INIT_ATM, P_DAMP
        ),
    )?;
    command(writer, "run", steps)?;
    command(writer, "unfix", "fNPT")?;
    command(writer, "next", "a")?;
    command(writer, "jump", "SELF loop")?;
    command(writer, "variable", "a delete")?;
    Ok(())
}

pub fn write_settings_to_path<P: AsRef<Path>>(sim: &SimulationParams, path: P) -> io::Result<()> {
    render_to_path(path, |w| write_settings(sim, w))
}

pub fn write_input_to_path<P: AsRef<Path>>(sim: &SimulationParams, path: P) -> io::Result<()> {
    render_to_path(path, |w| write_input(sim, w))
}
