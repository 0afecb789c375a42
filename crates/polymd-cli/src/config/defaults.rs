/// Values used when neither the config file nor the command line sets them.
pub struct DefaultsConfig {
    pub output_root: &'static str,
    pub t_init: f64,
    pub t_final: f64,
    pub t_interval: f64,
    pub production_steps: u64,
    pub pair_style: &'static str,
    pub elements: &'static str,
    pub project: &'static str,
    pub queue: &'static str,
    pub nodes: u32,
    pub ppn: u32,
    pub walltime: &'static str,
    pub lammps_exec: &'static str,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_root: ".",
            t_init: 600.0,
            t_final: 100.0,
            t_interval: 25.0,
            production_steps: 1_000_000,
            pair_style: "nn",
            elements: "C H",
            project: "GT-rramprasad3-CODA20",
            queue: "inferno",
            nodes: 2,
            ppn: 24,
            walltime: "48:00:00",
            lammps_exec: "lmp",
        }
    }
}
