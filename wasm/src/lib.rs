use awgnsim_core::analyzer;
use awgnsim_core::{ChannelModel, NoiseParameters, SignalToNoiseRatio, SimulationConfig};
use wasm_bindgen::prelude::*;

fn to_js<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_bits(bits: &[u8]) -> Vec<bool> {
    bits.iter().map(|&b| b != 0).collect()
}

fn from_bits(bits: &[bool]) -> Vec<u8> {
    bits.iter().map(|&b| b as u8).collect()
}

#[wasm_bindgen]
pub struct WasmChannelModel {
    inner: ChannelModel,
}

#[wasm_bindgen]
impl WasmChannelModel {
    /// `modulation`: bpsk | qpsk | qam16, `coding`: none | convolutional
    #[wasm_bindgen(constructor)]
    pub fn new(modulation: &str, coding: &str) -> Result<WasmChannelModel, JsValue> {
        ChannelModel::from_names(modulation, coding)
            .map(|inner| WasmChannelModel { inner })
            .map_err(to_js)
    }

    #[wasm_bindgen(getter, js_name = bitsPerSymbol)]
    pub fn bits_per_symbol(&self) -> usize {
        self.inner.bits_per_symbol()
    }

    #[wasm_bindgen(getter, js_name = codeRate)]
    pub fn code_rate(&self) -> f64 {
        self.inner.code_rate()
    }

    /// Takes a Uint8Array of 0/1 bits, returns a Float64Array of symbols
    pub fn modulate(&self, bits: &[u8]) -> Vec<f64> {
        self.inner.modulate(&to_bits(bits))
    }

    pub fn demodulate(&self, symbols: &[f64]) -> Vec<u8> {
        from_bits(&self.inner.demodulate(symbols))
    }

    pub fn encode(&self, bits: &[u8]) -> Vec<u8> {
        from_bits(&self.inner.encode(&to_bits(bits)))
    }

    pub fn decode(&self, soft_bits: &[f64]) -> Vec<u8> {
        from_bits(&self.inner.decode(soft_bits))
    }
}

#[wasm_bindgen(js_name = generateWaveform)]
pub fn generate_waveform(num_samples: usize, amplitude: f64, frequency: f64) -> Vec<f64> {
    awgnsim_core::generate_waveform(num_samples, amplitude, frequency)
}

#[wasm_bindgen(js_name = addNoise)]
pub fn add_noise(signal: &[f64], snr_db: f64, seed: u32) -> Result<Vec<f64>, JsValue> {
    awgnsim_core::add_noise(signal, &NoiseParameters::new(snr_db, seed as u64)).map_err(to_js)
}

#[wasm_bindgen(js_name = computeSnr)]
pub fn compute_snr(original: &[f64], noisy: &[f64]) -> Result<f64, JsValue> {
    analyzer::compute_snr(original, noisy).map_err(to_js)
}

#[wasm_bindgen(js_name = computeZeroCrossings)]
pub fn compute_zero_crossings(frequency: f64, bandwidth: f64, snr_db: f64) -> f64 {
    analyzer::zero_crossing_rate(frequency, bandwidth, snr_db)
}

#[wasm_bindgen(js_name = computeZeroCrossingPoints)]
pub fn compute_zero_crossing_points(noisy: &[f64]) -> Vec<u32> {
    analyzer::zero_crossing_points(noisy)
        .into_iter()
        .map(|i| i as u32)
        .collect()
}

/// Returns [within 1σ, within 2σ, within 3σ]
#[wasm_bindgen(js_name = computePhasorStatistics)]
pub fn compute_phasor_statistics(noisy: &[f64], original: &[f64], seed: u32) -> Result<Vec<f64>, JsValue> {
    let stats = analyzer::phasor_statistics(noisy, original, seed as u64).map_err(to_js)?;
    Ok(vec![stats.within_1_sigma, stats.within_2_sigma, stats.within_3_sigma])
}

#[wasm_bindgen(js_name = calculateEbN0)]
pub fn calculate_ebn0(signal: &[f64], snr_db: f64, bit_rate: f64, bandwidth: f64) -> Result<f64, JsValue> {
    SignalToNoiseRatio::new(snr_db, bit_rate, bandwidth)
        .ebn0_db(signal)
        .map_err(to_js)
}

fn parse_config(config_json: &str) -> Result<SimulationConfig, JsValue> {
    let config: SimulationConfig = serde_json::from_str(config_json).map_err(to_js)?;
    config.validate().map_err(to_js)?;
    Ok(config)
}

/// Full analog run; takes and returns JSON
#[wasm_bindgen(js_name = runAnalog)]
pub fn run_analog(config_json: &str) -> Result<String, JsValue> {
    let report = awgnsim_core::run_analog(&parse_config(config_json)?).map_err(to_js)?;
    serde_json::to_string(&report).map_err(to_js)
}

/// Full digital run; takes and returns JSON
#[wasm_bindgen(js_name = runDigital)]
pub fn run_digital(config_json: &str) -> Result<String, JsValue> {
    let report = awgnsim_core::run_digital(&parse_config(config_json)?).map_err(to_js)?;
    serde_json::to_string(&report).map_err(to_js)
}
