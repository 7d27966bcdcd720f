use crate::error::{ChannelSimError, Result};
use crate::{CONV_CONSTRAINT_LENGTH, CONV_STATE_MASK};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Channel coding applied before modulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodingScheme {
    #[default]
    None,
    #[serde(alias = "conv")]
    Convolutional,
}

impl CodingScheme {
    pub const ALL: [CodingScheme; 2] = [CodingScheme::None, CodingScheme::Convolutional];

    /// Information bits per coded bit
    pub const fn code_rate(self) -> f64 {
        match self {
            CodingScheme::None => 1.0,
            CodingScheme::Convolutional => 0.5,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            CodingScheme::None => "None",
            CodingScheme::Convolutional => "Convolutional",
        }
    }
}

impl fmt::Display for CodingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CodingScheme {
    type Err = ChannelSimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "uncoded" => Ok(CodingScheme::None),
            "convolutional" | "conv" => Ok(CodingScheme::Convolutional),
            other => Err(ChannelSimError::UnsupportedScheme(format!(
                "coding '{}'",
                other
            ))),
        }
    }
}

/// Index order of the coding selector: 0 = None, 1 = Convolutional
impl TryFrom<u8> for CodingScheme {
    type Error = ChannelSimError;

    fn try_from(index: u8) -> Result<Self> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or_else(|| ChannelSimError::UnsupportedScheme(format!("coding index {}", index)))
    }
}

// Register taps feeding each output alongside the input bit
const G1_STATE_TAPS: u8 = 0b011;
const G2_STATE_TAPS: u8 = 0b001;

/// Convolutional code rate 1/2, constraint length 3
/// Generator polynomials: G1 = 7 (octal), G2 = 5 (octal)
///
/// The 3-bit shift register starts at zero; every input bit produces two
/// output bits and is then shifted in from the top (oldest bit drops out).
/// No termination bits are appended.
#[derive(Debug, Clone, Default)]
pub struct ConvolutionalEncoder {
    state: u8,
}

impl ConvolutionalEncoder {
    pub fn new() -> Self {
        Self { state: 0 }
    }

    pub fn state(&self) -> u8 {
        self.state
    }

    /// Encode a single bit, returns 2 output bits
    pub fn encode_bit(&mut self, input: bool) -> [bool; 2] {
        let input_bit = input as u8;

        let out1 = input_bit ^ parity(self.state & G1_STATE_TAPS);
        let out2 = input_bit ^ parity(self.state & G2_STATE_TAPS);

        // New bit enters at the top of the register
        self.state =
            ((self.state >> 1) | (input_bit << (CONV_CONSTRAINT_LENGTH - 1))) & CONV_STATE_MASK;

        [out1 != 0, out2 != 0]
    }

    /// Encode a whole bit stream from a fresh register
    pub fn encode(&mut self, bits: &[bool]) -> Vec<bool> {
        self.reset();
        let mut output = Vec::with_capacity(bits.len() * 2);
        for &bit in bits {
            output.extend_from_slice(&self.encode_bit(bit));
        }
        output
    }

    pub fn reset(&mut self) {
        self.state = 0;
    }
}

/// Simplified rate-1/2 decoder
///
/// Thresholds each pair of soft values at zero and XORs the two hard bits
/// into one output bit. There is no trellis search, so it corrects nothing;
/// a trailing unpaired value is ignored.
pub fn decode_hard_pairs(soft_bits: &[f64]) -> Vec<bool> {
    soft_bits
        .chunks_exact(2)
        .map(|pair| (pair[0] > 0.0) ^ (pair[1] > 0.0))
        .collect()
}

fn parity(byte: u8) -> u8 {
    (byte.count_ones() & 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(v: &[u8]) -> Vec<bool> {
        v.iter().map(|&b| b != 0).collect()
    }

    #[test]
    fn test_code_rate() {
        assert_eq!(CodingScheme::None.code_rate(), 1.0);
        assert_eq!(CodingScheme::Convolutional.code_rate(), 0.5);
    }

    #[test]
    fn test_convolutional_encode_known_sequence() {
        let mut encoder = ConvolutionalEncoder::new();
        let coded = encoder.encode(&bits(&[1, 0, 1, 1]));
        assert_eq!(coded, bits(&[1, 1, 0, 0, 0, 1, 0, 0]));
    }

    #[test]
    fn test_encoder_state_progression() {
        let mut encoder = ConvolutionalEncoder::new();
        assert_eq!(encoder.state(), 0);
        encoder.encode_bit(true);
        assert_eq!(encoder.state(), 0b100);
        encoder.encode_bit(false);
        assert_eq!(encoder.state(), 0b010);
        encoder.encode_bit(true);
        assert_eq!(encoder.state(), 0b101);
        encoder.encode_bit(false);
        encoder.encode_bit(false);
        encoder.encode_bit(false);
        assert_eq!(encoder.state(), 0);
    }

    #[test]
    fn test_state_stays_within_register() {
        assert_eq!(CONV_STATE_MASK, 0b111);
        let mut encoder = ConvolutionalEncoder::new();
        for _ in 0..10 {
            encoder.encode_bit(true);
            assert!(encoder.state() <= CONV_STATE_MASK);
        }
        assert_eq!(encoder.state(), CONV_STATE_MASK);
    }

    #[test]
    fn test_encode_output_length() {
        let mut encoder = ConvolutionalEncoder::new();
        assert_eq!(encoder.encode(&[true; 13]).len(), 26);
        assert!(encoder.encode(&[]).is_empty());
    }

    #[test]
    fn test_encode_resets_between_calls() {
        let mut encoder = ConvolutionalEncoder::new();
        let input = bits(&[1, 1, 0, 1, 0, 0, 1]);
        let first = encoder.encode(&input);
        let second = encoder.encode(&input);
        assert_eq!(first, second);
    }

    #[test]
    fn test_convolutional_all_zeros() {
        let mut encoder = ConvolutionalEncoder::new();
        let coded = encoder.encode(&[false; 16]);
        assert!(coded.iter().all(|&b| !b));
    }

    #[test]
    fn test_decode_hard_pairs_xor() {
        // (+,+) -> 0, (+,-) -> 1, (-,+) -> 1, (-,-) -> 0
        let decoded = decode_hard_pairs(&[0.7, 1.0, 0.7, -1.0, -0.2, 0.4, -1.0, -1.0]);
        assert_eq!(decoded, bits(&[0, 1, 1, 0]));
    }

    #[test]
    fn test_decode_zero_counts_as_negative() {
        assert_eq!(decode_hard_pairs(&[0.0, 1.0]), bits(&[1]));
        assert_eq!(decode_hard_pairs(&[0.0, 0.0]), bits(&[0]));
    }

    #[test]
    fn test_decode_ignores_trailing_value() {
        assert_eq!(decode_hard_pairs(&[1.0, -1.0, 1.0]).len(), 1);
        assert!(decode_hard_pairs(&[]).is_empty());
    }

    #[test]
    fn test_decoder_recovers_register_tap() {
        // out1 ^ out2 leaves the bit two places back in the register
        let mut encoder = ConvolutionalEncoder::new();
        let input = bits(&[1, 0, 1, 1, 0, 0, 1, 0]);
        let soft: Vec<f64> = encoder
            .encode(&input)
            .iter()
            .map(|&b| if b { 1.0 } else { -1.0 })
            .collect();
        let decoded = decode_hard_pairs(&soft);
        assert_eq!(decoded.len(), input.len());
        assert_eq!(&decoded[..2], &[false, false]);
        assert_eq!(&decoded[2..], &input[..input.len() - 2]);
    }

    #[test]
    fn test_parse_coding_scheme() {
        assert_eq!("none".parse::<CodingScheme>().unwrap(), CodingScheme::None);
        assert_eq!(
            "Convolutional".parse::<CodingScheme>().unwrap(),
            CodingScheme::Convolutional
        );
        assert!(matches!(
            "turbo".parse::<CodingScheme>(),
            Err(ChannelSimError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_coding_from_index() {
        assert_eq!(CodingScheme::try_from(0).unwrap(), CodingScheme::None);
        assert_eq!(CodingScheme::try_from(1).unwrap(), CodingScheme::Convolutional);
        assert!(CodingScheme::try_from(2).is_err());
    }
}
