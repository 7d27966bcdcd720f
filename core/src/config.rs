use crate::coding::CodingScheme;
use crate::error::{ChannelSimError, Result};
use crate::modulation::ModulationScheme;
use crate::{MAX_SAMPLES, MIN_SAMPLES};
use serde::{Deserialize, Serialize};

/// Parameters of one simulation run
///
/// The simulation functions trust these values; call [`validate`] at the
/// edge (CLI, bindings) before running.
///
/// [`validate`]: SimulationConfig::validate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub amplitude: f64,
    /// Cycles per sample
    pub frequency: f64,
    pub num_samples: usize,
    pub snr_db: f64,
    pub bandwidth: f64,
    pub bit_rate: f64,
    pub seed: u64,
    pub modulation: ModulationScheme,
    pub coding: CodingScheme,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            frequency: 0.05,
            num_samples: 1000,
            snr_db: 10.0,
            bandwidth: 0.1,
            bit_rate: 1000.0,
            seed: 0,
            modulation: ModulationScheme::Bpsk,
            coding: CodingScheme::None,
        }
    }
}

impl SimulationConfig {
    /// Range checks on every user-supplied parameter
    pub fn validate(&self) -> Result<()> {
        if !(self.amplitude > 0.0) {
            return Err(invalid("Amplitude must be greater than 0"));
        }
        if !(self.frequency > 0.0) {
            return Err(invalid("Frequency must be greater than 0"));
        }
        if !(MIN_SAMPLES..=MAX_SAMPLES).contains(&self.num_samples) {
            return Err(invalid("Number of samples must be between 1 and 100,000"));
        }
        if !(self.snr_db >= 0.0) {
            return Err(invalid("SNR must be non-negative"));
        }
        if !(self.bit_rate > 0.0) {
            return Err(invalid("Bit rate must be greater than 0"));
        }
        if !(self.bandwidth > 0.0) {
            return Err(invalid("Bandwidth must be greater than 0"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> ChannelSimError {
    ChannelSimError::InvalidConfig(message.to_string())
}
