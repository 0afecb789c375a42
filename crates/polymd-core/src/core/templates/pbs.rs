use super::render_to_path;
use crate::core::models::job::JobParams;
use std::io::{self, Write};
use std::path::Path;

pub const JOB_SCRIPT_FILE_NAME: &str = "job.pbs";

/// Writes a PBS script that runs the MD engine on `input_file` with one MPI rank
/// per requested processor.
pub fn write_job_script(
    job: &JobParams,
    job_name: &str,
    input_file: &str,
    writer: &mut impl Write,
) -> io::Result<()> {
    writeln!(writer, "#PBS -A {}", job.project)?;
    writeln!(writer, "#PBS -q {}", job.queue)?;
    writeln!(writer, "#PBS -N {}", job_name)?;
    writeln!(writer, "#PBS -l nodes={}:ppn={}", job.nodes, job.ppn)?;
    writeln!(writer, "#PBS -l walltime={}", job.walltime)?;
    writeln!(writer, "#PBS -j oe")?;
    writeln!(writer, "#PBS -o out.$PBS_JOBID")?;
    writeln!(writer)?;
    writeln!(writer, "cd $PBS_O_WORKDIR")?;
    writeln!(
        writer,
        "mpirun -np {} {} -in {}",
        job.total_processes(),
        job.lammps_exec,
        input_file
    )?;
    Ok(())
}

pub fn write_job_script_to_path<P: AsRef<Path>>(
    job: &JobParams,
    job_name: &str,
    input_file: &str,
    path: P,
) -> io::Result<()> {
    render_to_path(path, |w| write_job_script(job, job_name, input_file, w))
}
