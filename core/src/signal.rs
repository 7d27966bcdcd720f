use std::f64::consts::PI;

/// Sampled sine source: `sample[i] = amplitude * sin(2π * frequency * i)`
///
/// `frequency` is in cycles per sample. Range checks (amplitude > 0,
/// frequency > 0, 1..=MAX_SAMPLES samples) belong to the caller, see
/// [`crate::SimulationConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalGenerator {
    num_samples: usize,
    amplitude: f64,
    frequency: f64,
}

impl SignalGenerator {
    pub fn new(num_samples: usize, amplitude: f64, frequency: f64) -> Self {
        Self {
            num_samples,
            amplitude,
            frequency,
        }
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Generate the waveform. Deterministic, allocates exactly `num_samples`.
    pub fn generate(&self) -> Vec<f64> {
        (0..self.num_samples)
            .map(|i| self.amplitude * (2.0 * PI * self.frequency * i as f64).sin())
            .collect()
    }
}

/// Shorthand for `SignalGenerator::new(..).generate()`
pub fn generate_waveform(num_samples: usize, amplitude: f64, frequency: f64) -> Vec<f64> {
    SignalGenerator::new(num_samples, amplitude, frequency).generate()
}
