use crate::coding::{decode_hard_pairs, CodingScheme, ConvolutionalEncoder};
use crate::error::Result;
use crate::modulation::ModulationScheme;

/// Digital channel: modulation plus optional channel coding
///
/// Bits per symbol and code rate are fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelModel {
    modulation: ModulationScheme,
    coding: CodingScheme,
    bits_per_symbol: usize,
    code_rate: f64,
}

impl ChannelModel {
    pub fn new(modulation: ModulationScheme, coding: CodingScheme) -> Self {
        Self {
            modulation,
            coding,
            bits_per_symbol: modulation.bits_per_symbol(),
            code_rate: coding.code_rate(),
        }
    }

    /// Build from scheme names, e.g. `("qpsk", "convolutional")`
    pub fn from_names(modulation: &str, coding: &str) -> Result<Self> {
        Ok(Self::new(modulation.parse()?, coding.parse()?))
    }

    /// Build from selector indices (BPSK/QPSK/16-QAM, None/Convolutional)
    pub fn from_indices(modulation: u8, coding: u8) -> Result<Self> {
        Ok(Self::new(
            ModulationScheme::try_from(modulation)?,
            CodingScheme::try_from(coding)?,
        ))
    }

    pub fn modulation(&self) -> ModulationScheme {
        self.modulation
    }

    pub fn coding(&self) -> CodingScheme {
        self.coding
    }

    pub fn bits_per_symbol(&self) -> usize {
        self.bits_per_symbol
    }

    pub fn code_rate(&self) -> f64 {
        self.code_rate
    }

    /// Channel-encode a bit stream (identity without coding)
    pub fn encode(&self, bits: &[bool]) -> Vec<bool> {
        match self.coding {
            CodingScheme::None => bits.to_vec(),
            CodingScheme::Convolutional => ConvolutionalEncoder::new().encode(bits),
        }
    }

    /// Decode soft values into bits
    ///
    /// With convolutional coding this is the simplified pairwise XOR decoder
    /// (no trellis search). Without coding the values are sliced with the
    /// modulation's hard-decision demodulator.
    pub fn decode(&self, soft_bits: &[f64]) -> Vec<bool> {
        match self.coding {
            CodingScheme::None => self.modulation.demodulate(soft_bits),
            CodingScheme::Convolutional => decode_hard_pairs(soft_bits),
        }
    }

    /// Encode (when coded) then map to symbols
    pub fn modulate(&self, bits: &[bool]) -> Vec<f64> {
        let coded = self.encode(bits);
        self.modulation.modulate(&coded)
    }

    /// Demodulate symbols back to information bits
    ///
    /// When coded, the decoder consumes the received symbol values directly
    /// rather than the sliced bits.
    pub fn demodulate(&self, symbols: &[f64]) -> Vec<bool> {
        match self.coding {
            CodingScheme::None => self.modulation.demodulate(symbols),
            CodingScheme::Convolutional => decode_hard_pairs(symbols),
        }
    }
}
