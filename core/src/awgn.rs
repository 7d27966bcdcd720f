//! Additive White Gaussian Noise injection
//!
//! Noise power is derived per call from the measured power of the input and
//! the target SNR. Gaussian samples come from the Box-Muller transform over
//! a generator seeded by the caller, one uniform pair per output sample, so
//! a given (seed, length) always yields the same noise sequence.

use crate::channel::ChannelModel;
use crate::coding::CodingScheme;
use crate::error::Result;
use crate::modulation::ModulationScheme;
use crate::snr::SignalToNoiseRatio;
use rand::distributions::Open01;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Everything that, together with the input waveform, fixes the noise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseParameters {
    pub target_snr_db: f64,
    /// Only used for Eb/N0 on the digital path
    pub bit_rate: f64,
    pub bandwidth: f64,
    pub seed: u64,
}

impl NoiseParameters {
    pub fn new(target_snr_db: f64, seed: u64) -> Self {
        Self {
            target_snr_db,
            bit_rate: 1.0,
            bandwidth: 1.0,
            seed,
        }
    }

    pub fn with_rates(mut self, bit_rate: f64, bandwidth: f64) -> Self {
        self.bit_rate = bit_rate;
        self.bandwidth = bandwidth;
        self
    }

    pub fn snr_controller(&self) -> SignalToNoiseRatio {
        SignalToNoiseRatio::new(self.target_snr_db, self.bit_rate, self.bandwidth)
    }
}

/// Standard normal source using the Box-Muller transform
///
/// Only the cosine branch is used; the sine branch is discarded so each
/// sample consumes exactly two uniforms.
pub struct GaussianSource {
    rng: ChaCha8Rng,
}

impl GaussianSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Next N(0, 1) sample
    pub fn next_sample(&mut self) -> f64 {
        // Open01 excludes 0, keeps ln(u1) finite
        let u1: f64 = self.rng.sample(Open01);
        let u2: f64 = self.rng.sample(Open01);
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }
}

/// Return a noisy copy of `signal` at `params.target_snr_db`
///
/// An empty signal yields an empty result without touching the generator.
pub fn add_noise(signal: &[f64], params: &NoiseParameters) -> Result<Vec<f64>> {
    if signal.is_empty() {
        return Ok(Vec::new());
    }

    let noise_power = params.snr_controller().noise_power_for(signal)?;
    let noise_std_dev = noise_power.sqrt();
    log::debug!(
        "AWGN: {} samples, target {:.2} dB, noise power {:.6e}, seed {}",
        signal.len(),
        params.target_snr_db,
        noise_power,
        params.seed
    );

    let mut source = GaussianSource::new(params.seed);
    Ok(signal
        .iter()
        .map(|&x| x + noise_std_dev * source.next_sample())
        .collect())
}

/// AWGN stage of the digital link
///
/// Owns the SNR controller, the channel model used on either side of the
/// noise, and the seed. Each call to [`AwgnChannel::add_noise`] starts from
/// a fresh generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AwgnChannel {
    snr: SignalToNoiseRatio,
    seed: u64,
    channel: ChannelModel,
}

impl AwgnChannel {
    pub fn new(
        target_snr_db: f64,
        bit_rate: f64,
        bandwidth: f64,
        modulation: ModulationScheme,
        coding: CodingScheme,
        seed: u64,
    ) -> Self {
        Self {
            snr: SignalToNoiseRatio::new(target_snr_db, bit_rate, bandwidth),
            seed,
            channel: ChannelModel::new(modulation, coding),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn snr_controller(&self) -> &SignalToNoiseRatio {
        &self.snr
    }

    pub fn channel_model(&self) -> &ChannelModel {
        &self.channel
    }

    pub fn noise_parameters(&self) -> NoiseParameters {
        NoiseParameters {
            target_snr_db: self.snr.target_snr_db(),
            bit_rate: self.snr.bit_rate(),
            bandwidth: self.snr.bandwidth(),
            seed: self.seed,
        }
    }

    pub fn add_noise(&self, signal: &[f64]) -> Result<Vec<f64>> {
        add_noise(signal, &self.noise_parameters())
    }

    /// Modulate, scale by `amplitude`, add noise, demodulate.
    /// Returns (clean, noisy, decoded).
    pub fn transmit(
        &self,
        bits: &[bool],
        amplitude: f64,
    ) -> Result<(Vec<f64>, Vec<f64>, Vec<bool>)> {
        let clean: Vec<f64> = self
            .channel
            .modulate(bits)
            .into_iter()
            .map(|s| s * amplitude)
            .collect();
        let noisy = self.add_noise(&clean)?;
        let decoded = self.channel.demodulate(&noisy);
        Ok((clean, noisy, decoded))
    }
}
