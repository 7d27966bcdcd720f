use crate::error::{ChannelSimError, Result};

/// Mean of squared samples. Rejects empty input instead of returning NaN.
pub fn signal_power(signal: &[f64]) -> Result<f64> {
    if signal.is_empty() {
        return Err(ChannelSimError::EmptySignal);
    }
    Ok(signal.iter().map(|x| x * x).sum::<f64>() / signal.len() as f64)
}

/// Noise power that yields `snr_db` against a signal of `signal_power`
pub fn noise_power(signal_power: f64, snr_db: f64) -> f64 {
    signal_power / 10f64.powf(snr_db / 10.0)
}

/// SNR controller
///
/// Holds the target SNR, bit rate and bandwidth. Every method is a pure
/// function of those three values and the waveform passed in; nothing is
/// cached between calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalToNoiseRatio {
    target_snr_db: f64,
    bit_rate: f64,
    bandwidth: f64,
}

impl SignalToNoiseRatio {
    pub fn new(target_snr_db: f64, bit_rate: f64, bandwidth: f64) -> Self {
        Self {
            target_snr_db,
            bit_rate,
            bandwidth,
        }
    }

    pub fn target_snr_db(&self) -> f64 {
        self.target_snr_db
    }

    pub fn set_target_snr_db(&mut self, snr_db: f64) {
        self.target_snr_db = snr_db;
    }

    pub fn bit_rate(&self) -> f64 {
        self.bit_rate
    }

    pub fn set_bit_rate(&mut self, bit_rate: f64) {
        self.bit_rate = bit_rate;
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn set_bandwidth(&mut self, bandwidth: f64) {
        self.bandwidth = bandwidth;
    }

    /// Noise power for `signal_power` at the configured target SNR
    pub fn noise_power(&self, signal_power: f64) -> f64 {
        noise_power(signal_power, self.target_snr_db)
    }

    /// Noise power needed to bring `signal` to the target SNR, measured fresh
    pub fn noise_power_for(&self, signal: &[f64]) -> Result<f64> {
        Ok(self.noise_power(signal_power(signal)?))
    }

    /// Eb/N0 in dB: `(S / bit_rate) / (N / bandwidth)`
    pub fn ebn0_db(&self, signal: &[f64]) -> Result<f64> {
        let power = signal_power(signal)?;
        let eb = power / self.bit_rate;
        let n0 = self.noise_power(power) / self.bandwidth;
        Ok(10.0 * (eb / n0).log10())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_power_constant() {
        assert_eq!(signal_power(&[2.0, -2.0, 2.0, -2.0]).unwrap(), 4.0);
    }

    #[test]
    fn test_signal_power_empty_is_error() {
        assert!(matches!(signal_power(&[]), Err(ChannelSimError::EmptySignal)));
    }

    #[test]
    fn test_noise_power_from_snr() {
        assert!((noise_power(1.0, 10.0) - 0.1).abs() < 1e-12);
        assert!((noise_power(4.0, 0.0) - 4.0).abs() < 1e-12);
        assert!((noise_power(2.0, 20.0) - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_noise_power_tracks_current_signal() {
        let snr = SignalToNoiseRatio::new(10.0, 1.0, 1.0);
        let weak = snr.noise_power_for(&[1.0, -1.0]).unwrap();
        let strong = snr.noise_power_for(&[3.0, -3.0]).unwrap();
        assert!((weak - 0.1).abs() < 1e-12);
        assert!((strong - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_ebn0_equals_snr_when_rates_match() {
        let snr = SignalToNoiseRatio::new(7.5, 1000.0, 1000.0);
        let ebn0 = snr.ebn0_db(&[1.0, -1.0, 1.0]).unwrap();
        assert!((ebn0 - 7.5).abs() < 1e-9, "ebn0 = {}", ebn0);
    }

    #[test]
    fn test_ebn0_bandwidth_ratio() {
        // Eb/N0 = SNR + 10 log10(B / R)
        let snr = SignalToNoiseRatio::new(10.0, 1000.0, 10_000.0);
        let ebn0 = snr.ebn0_db(&[0.5, -0.5]).unwrap();
        assert!((ebn0 - 20.0).abs() < 1e-9, "ebn0 = {}", ebn0);
    }

    #[test]
    fn test_ebn0_empty_is_error() {
        let snr = SignalToNoiseRatio::new(10.0, 1.0, 1.0);
        assert!(snr.ebn0_db(&[]).is_err());
    }

    #[test]
    fn test_setters() {
        let mut snr = SignalToNoiseRatio::new(0.0, 1.0, 1.0);
        snr.set_target_snr_db(3.0);
        snr.set_bit_rate(9600.0);
        snr.set_bandwidth(3000.0);
        assert_eq!(snr.target_snr_db(), 3.0);
        assert_eq!(snr.bit_rate(), 9600.0);
        assert_eq!(snr.bandwidth(), 3000.0);
    }
}
