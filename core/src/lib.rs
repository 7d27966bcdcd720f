//! AWGN channel simulation library
//!
//! Generates sampled waveforms, corrupts them with seeded additive white
//! Gaussian noise at a target SNR, runs BPSK/QPSK/16-QAM modulation with an
//! optional rate-1/2 convolutional code, and measures the result (SNR,
//! zero crossings, phasor spread, bit error rate).

pub mod error;
pub mod signal;
pub mod snr;
pub mod coding;
pub mod modulation;
pub mod channel;
pub mod awgn;
pub mod analyzer;
pub mod config;
pub mod pipeline;

pub use analyzer::{AnalysisResult, Analyzer, PhasorStatistics};
pub use awgn::{add_noise, AwgnChannel, NoiseParameters};
pub use channel::ChannelModel;
pub use coding::CodingScheme;
pub use config::SimulationConfig;
pub use error::{ChannelSimError, Result};
pub use modulation::ModulationScheme;
pub use pipeline::{ber_sweep, run_analog, run_digital, AnalogReport, BerPoint, DigitalReport};
pub use signal::{generate_waveform, SignalGenerator};
pub use snr::{noise_power, signal_power, SignalToNoiseRatio};

// Input contract
pub const MIN_SAMPLES: usize = 1;
pub const MAX_SAMPLES: usize = 100_000;

// Constellation scaling
pub const QPSK_SCALE: f64 = std::f64::consts::FRAC_1_SQRT_2; // sqrt(2) / 2
pub const QAM16_NORM: f64 = 3.162_277_660_168_379_5; // sqrt(10), unit average power
pub const QAM16_DECISION_LEVEL: f64 = 2.0; // slicer threshold before scaling

// Convolutional code (K = 3, generators 7 and 5 octal)
pub const CONV_CONSTRAINT_LENGTH: usize = 3;
pub const CONV_STATE_MASK: u8 = (1 << CONV_CONSTRAINT_LENGTH) - 1;
