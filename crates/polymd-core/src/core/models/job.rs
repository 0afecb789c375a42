/// Scheduler resources for the PBS job running the MD engine. The job name is
/// supplied per sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobParams {
    pub project: String,
    pub queue: String,
    pub nodes: u32,
    /// Processors per node.
    pub ppn: u32,
    /// Walltime as `HH:MM:SS`.
    pub walltime: String,
    pub lammps_exec: String,
}

impl JobParams {
    pub fn total_processes(&self) -> u64 {
        self.nodes as u64 * self.ppn as u64
    }
}
