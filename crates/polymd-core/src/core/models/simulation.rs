use serde::Deserialize;

pub const T_MAX_KELVIN: f64 = 1000.0;
/// 50000 bar, in atm.
pub const P_MAX_ATM: f64 = 49346.163;
pub const P_INIT_ATM: f64 = 1.0;

/// One stage of the equilibration protocol.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "ensemble", rename_all = "kebab-case", deny_unknown_fields)]
pub enum EquilibrationStage {
    Nvt {
        steps: u64,
        temperature: f64,
    },
    Npt {
        steps: u64,
        temperature: f64,
        pressure: f64,
    },
}

impl EquilibrationStage {
    pub fn steps(&self) -> u64 {
        match self {
            Self::Nvt { steps, .. } | Self::Npt { steps, .. } => *steps,
        }
    }
}

/// The 21-stage compression/relaxation protocol used to equilibrate amorphous
/// polymer boxes before production.
///
/// Cycles of heating to [`T_MAX_KELVIN`], cooling to `t_init` and compressing at a
/// fraction of [`P_MAX_ATM`], ending with a long NPT run at 1 atm.
pub fn default_protocol(t_init: f64) -> Vec<EquilibrationStage> {
    use EquilibrationStage::{Npt, Nvt};

    let nvt = |steps, temperature| Nvt { steps, temperature };
    let npt = |steps, pressure| Npt {
        steps,
        temperature: t_init,
        pressure,
    };

    vec![
        nvt(50000, T_MAX_KELVIN),
        nvt(50000, t_init),
        npt(50000, 0.02 * P_MAX_ATM),
        nvt(50000, T_MAX_KELVIN),
        nvt(100000, t_init),
        npt(50000, 0.6 * P_MAX_ATM),
        nvt(50000, T_MAX_KELVIN),
        nvt(100000, t_init),
        npt(50000, P_MAX_ATM),
        nvt(50000, T_MAX_KELVIN),
        nvt(100000, t_init),
        npt(5000, 0.5 * P_MAX_ATM),
        nvt(5000, T_MAX_KELVIN),
        nvt(10000, t_init),
        npt(5000, 0.1 * P_MAX_ATM),
        nvt(5000, T_MAX_KELVIN),
        nvt(10000, t_init),
        npt(5000, 0.01 * P_MAX_ATM),
        nvt(5000, T_MAX_KELVIN),
        nvt(10000, t_init),
        npt(800000, P_INIT_ATM),
    ]
}

/// Parameters of the MD engine run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    /// Highest temperature of the production cooling ramp, in K.
    pub t_init: f64,
    /// Lowest temperature of the production cooling ramp, in K.
    pub t_final: f64,
    /// Temperature decrement between production segments, in K.
    pub t_interval: f64,
    /// Steps run at each production temperature.
    pub production_steps: u64,
    /// Path of the neural-network potential passed to `pair_coeff`.
    pub potential_path: String,
    pub pair_style: String,
    /// Element names mapped onto atom types, in type order.
    pub elements: String,
    /// Stem of the data file read by the input script.
    pub datafile_prefix: String,
    pub protocol: Vec<EquilibrationStage>,
}

impl SimulationParams {
    /// Number of production segments in the cooling ramp, `t_init` and `t_final`
    /// both included when the interval divides the range.
    pub fn temperature_points(&self) -> u64 {
        ((self.t_init - self.t_final) / self.t_interval + 1.0).floor() as u64
    }

    pub fn equilibration_steps(&self) -> u64 {
        self.protocol.iter().map(EquilibrationStage::steps).sum()
    }
}
