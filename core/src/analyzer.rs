//! Signal quality metrics computed from a clean/noisy pair

use crate::error::{ChannelSimError, Result};
use crate::snr::signal_power;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

/// Fractions of a 2-D Gaussian cloud inside 1, 2 and 3 standard deviations
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PhasorStatistics {
    pub within_1_sigma: f64,
    pub within_2_sigma: f64,
    pub within_3_sigma: f64,
}

impl PhasorStatistics {
    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.within_1_sigma, self.within_2_sigma, self.within_3_sigma)
    }
}

/// Metrics for one simulation run
///
/// `measured_snr_db` is `+inf` when the noisy signal equals the original
/// (serialized as `null` in JSON).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub measured_snr_db: f64,
    pub zero_crossing_rate: f64,
    pub zero_crossing_indices: Vec<usize>,
    pub phasor: PhasorStatistics,
    pub bit_error_rate: Option<f64>,
}

fn check_lengths(original: &[f64], noisy: &[f64]) -> Result<()> {
    if original.len() != noisy.len() {
        return Err(ChannelSimError::LengthMismatch {
            original: original.len(),
            noisy: noisy.len(),
        });
    }
    Ok(())
}

fn residual(original: &[f64], noisy: &[f64]) -> Vec<f64> {
    noisy.iter().zip(original).map(|(y, x)| y - x).collect()
}

/// Measured SNR in dB, `+inf` when the residual noise power is exactly zero
pub fn compute_snr(original: &[f64], noisy: &[f64]) -> Result<f64> {
    check_lengths(original, noisy)?;

    let signal_power = signal_power(original)?;
    let noise_power = signal_power_of_residual(original, noisy)?;

    if noise_power == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (signal_power / noise_power).log10())
}

fn signal_power_of_residual(original: &[f64], noisy: &[f64]) -> Result<f64> {
    signal_power(&residual(original, noisy))
}

/// Closed-form zero-crossing rate of a sine of `frequency` in band-limited noise
///
/// `f * sqrt((snr + 1 + B^2 / (12 f^2)) / (snr + 1))` with the SNR linear.
/// Estimated from parameters only; no samples are inspected.
pub fn zero_crossing_rate(frequency: f64, bandwidth: f64, snr_db: f64) -> f64 {
    let snr_linear = 10f64.powf(snr_db / 10.0);
    let term = (snr_linear + 1.0 + (bandwidth * bandwidth) / (12.0 * frequency * frequency))
        / (snr_linear + 1.0);
    frequency * term.sqrt()
}

/// Indices `i` where the signal crosses zero between `i - 1` and `i`
///
/// A crossing is negative -> non-negative or positive -> non-positive, so a
/// sample sitting exactly on zero counts once on the way in.
pub fn zero_crossing_points(signal: &[f64]) -> Vec<usize> {
    signal
        .windows(2)
        .enumerate()
        .filter(|(_, w)| (w[0] < 0.0 && w[1] >= 0.0) || (w[0] > 0.0 && w[1] <= 0.0))
        .map(|(i, _)| i + 1)
        .collect()
}

/// Rayleigh spread of the noise between `original` and `noisy`
///
/// The noise power of the residual sets `sigma = sqrt(P / 2)`. A synthetic
/// 2-D Gaussian cloud of the same length (N(0, sigma) per axis, seeded) is
/// drawn and the fraction of points with magnitude within 1, 2 and 3 sigma
/// is reported. The cloud is regenerated, not taken from the residual.
pub fn phasor_statistics(noisy: &[f64], original: &[f64], seed: u64) -> Result<PhasorStatistics> {
    check_lengths(original, noisy)?;

    let noise_power = signal_power_of_residual(original, noisy)?;
    let sigma = (noise_power / 2.0).sqrt();
    let dist = Normal::new(0.0, sigma)
        .map_err(|e| ChannelSimError::InvalidArgument(format!("phasor sigma {}: {}", sigma, e)))?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut counts = [0usize; 3];
    for _ in 0..noisy.len() {
        let re = dist.sample(&mut rng);
        let im = dist.sample(&mut rng);
        let magnitude = re.hypot(im);
        for (k, count) in counts.iter_mut().enumerate() {
            if magnitude <= (k + 1) as f64 * sigma {
                *count += 1;
            }
        }
    }

    let n = noisy.len() as f64;
    Ok(PhasorStatistics {
        within_1_sigma: counts[0] as f64 / n,
        within_2_sigma: counts[1] as f64 / n,
        within_3_sigma: counts[2] as f64 / n,
    })
}

/// Fraction of `original` bits not matched in `decoded`
///
/// Positions past the end of the shorter stream are not counted as errors;
/// the denominator is always the original length.
pub fn bit_error_rate(original: &[bool], decoded: &[bool]) -> Result<f64> {
    if original.is_empty() {
        return Err(ChannelSimError::InvalidArgument(
            "bit error rate needs at least one transmitted bit".to_string(),
        ));
    }
    let errors = original
        .iter()
        .zip(decoded)
        .filter(|(a, b)| a != b)
        .count();
    Ok(errors as f64 / original.len() as f64)
}

/// Analysis settings shared by every metric of one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Analyzer {
    pub frequency: f64,
    pub bandwidth: f64,
    pub snr_db: f64,
    pub seed: u64,
}

impl Analyzer {
    pub fn new(frequency: f64, bandwidth: f64, snr_db: f64, seed: u64) -> Self {
        Self {
            frequency,
            bandwidth,
            snr_db,
            seed,
        }
    }

    /// All waveform metrics for a clean/noisy pair
    pub fn analyze(&self, original: &[f64], noisy: &[f64]) -> Result<AnalysisResult> {
        Ok(AnalysisResult {
            measured_snr_db: compute_snr(original, noisy)?,
            zero_crossing_rate: zero_crossing_rate(self.frequency, self.bandwidth, self.snr_db),
            zero_crossing_indices: zero_crossing_points(noisy),
            phasor: phasor_statistics(noisy, original, self.seed)?,
            bit_error_rate: None,
        })
    }

    /// Waveform metrics plus the bit error rate of a digital run
    pub fn analyze_with_bits(
        &self,
        original: &[f64],
        noisy: &[f64],
        bits: &[bool],
        decoded: &[bool],
    ) -> Result<AnalysisResult> {
        let mut result = self.analyze(original, noisy)?;
        result.bit_error_rate = Some(bit_error_rate(bits, decoded)?);
        Ok(result)
    }
}
