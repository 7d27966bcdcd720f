//! End-to-end simulation runs
//!
//! Analog: sine -> AWGN -> waveform metrics.
//! Digital: random bits -> (encode) -> modulate -> scale -> AWGN ->
//! demodulate (decode) -> BER and Eb/N0.
//!
//! Every run builds its components from the config and drops them at the
//! end; nothing is shared between runs.

use crate::analyzer::{bit_error_rate, AnalysisResult, Analyzer};
use crate::awgn::{add_noise, AwgnChannel, NoiseParameters};
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::signal::SignalGenerator;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AnalogReport {
    pub config: SimulationConfig,
    pub clean: Vec<f64>,
    pub noisy: Vec<f64>,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct DigitalReport {
    pub config: SimulationConfig,
    pub bits: Vec<bool>,
    pub decoded_bits: Vec<bool>,
    pub clean: Vec<f64>,
    pub noisy: Vec<f64>,
    pub bit_error_rate: f64,
    pub ebn0_db: f64,
}

/// One row of a BER curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BerPoint {
    pub snr_db: f64,
    pub ebn0_db: f64,
    pub bit_error_rate: f64,
}

/// Uniform random bits from a generator seeded with `seed`
pub fn random_bits(count: usize, seed: u64) -> Vec<bool> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen_bool(0.5)).collect()
}

/// Sine through AWGN, measured against the clean copy
pub fn run_analog(config: &SimulationConfig) -> Result<AnalogReport> {
    let clean =
        SignalGenerator::new(config.num_samples, config.amplitude, config.frequency).generate();
    let params = NoiseParameters::new(config.snr_db, config.seed)
        .with_rates(config.bit_rate, config.bandwidth);
    let noisy = add_noise(&clean, &params)?;

    let analyzer = Analyzer::new(config.frequency, config.bandwidth, config.snr_db, config.seed);
    let analysis = analyzer.analyze(&clean, &noisy)?;
    log::debug!(
        "analog run: measured SNR {:.3} dB, {} zero crossings",
        analysis.measured_snr_db,
        analysis.zero_crossing_indices.len()
    );

    Ok(AnalogReport {
        config: config.clone(),
        clean,
        noisy,
        analysis,
    })
}

/// `num_samples` random bits across the configured digital link
///
/// Symbols are scaled by `amplitude` before noise; the 16-QAM slicer works
/// on fixed unit-power thresholds and does not undo that scaling.
pub fn run_digital(config: &SimulationConfig) -> Result<DigitalReport> {
    let bits = random_bits(config.num_samples, config.seed);

    let channel = AwgnChannel::new(
        config.snr_db,
        config.bit_rate,
        config.bandwidth,
        config.modulation,
        config.coding,
        config.seed,
    );
    let (clean, noisy, decoded_bits) = channel.transmit(&bits, config.amplitude)?;

    let bit_error_rate = bit_error_rate(&bits, &decoded_bits)?;
    let ebn0_db = channel.snr_controller().ebn0_db(&clean)?;
    log::debug!(
        "digital run: {} {} coding, {} bits -> {} symbols, BER {:.4}, Eb/N0 {:.2} dB",
        config.modulation,
        config.coding,
        bits.len(),
        clean.len(),
        bit_error_rate,
        ebn0_db
    );

    Ok(DigitalReport {
        config: config.clone(),
        bits,
        decoded_bits,
        clean,
        noisy,
        bit_error_rate,
        ebn0_db,
    })
}

/// Digital run repeated at each SNR in `snr_points_db`
pub fn ber_sweep(config: &SimulationConfig, snr_points_db: &[f64]) -> Result<Vec<BerPoint>> {
    snr_points_db
        .iter()
        .map(|&snr_db| {
            let point_config = SimulationConfig {
                snr_db,
                ..config.clone()
            };
            let report = run_digital(&point_config)?;
            Ok(BerPoint {
                snr_db,
                ebn0_db: report.ebn0_db,
                bit_error_rate: report.bit_error_rate,
            })
        })
        .collect()
}
