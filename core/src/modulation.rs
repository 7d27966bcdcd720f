//! Bit-to-symbol mapping for BPSK, QPSK and 16-QAM
//!
//! Symbols are real-valued. QPSK stores each (I, Q) pair as two consecutive
//! entries; 16-QAM stores (I, Q, I, Q) per 4-bit group so one symbol entry
//! corresponds to one bit on every scheme. Trailing bits that do not fill a
//! whole symbol are dropped.

use crate::error::{ChannelSimError, Result};
use crate::{QAM16_DECISION_LEVEL, QAM16_NORM, QPSK_SCALE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModulationScheme {
    #[default]
    Bpsk,
    Qpsk,
    #[serde(alias = "16qam", alias = "16-qam")]
    Qam16,
}

/// 16-QAM axis levels indexed by the 2-bit value (b0 * 2 + b1), before scaling
///
/// 00 -> -3, 01 -> -1, 10 -> +3, 11 -> +1. Not Gray coded.
const QAM16_LEVELS: [f64; 4] = [-3.0, -1.0, 3.0, 1.0];

impl ModulationScheme {
    pub const ALL: [ModulationScheme; 3] = [
        ModulationScheme::Bpsk,
        ModulationScheme::Qpsk,
        ModulationScheme::Qam16,
    ];

    pub const fn bits_per_symbol(self) -> usize {
        match self {
            ModulationScheme::Bpsk => 1,
            ModulationScheme::Qpsk => 2,
            ModulationScheme::Qam16 => 4,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ModulationScheme::Bpsk => "BPSK",
            ModulationScheme::Qpsk => "QPSK",
            ModulationScheme::Qam16 => "16-QAM",
        }
    }

    /// Map bits to symbols, dropping an incomplete trailing group
    pub fn modulate(self, bits: &[bool]) -> Vec<f64> {
        match self {
            ModulationScheme::Bpsk => modulate_bpsk(bits),
            ModulationScheme::Qpsk => modulate_qpsk(bits),
            ModulationScheme::Qam16 => modulate_qam16(bits),
        }
    }

    /// Hard-decision inverse of [`ModulationScheme::modulate`]
    pub fn demodulate(self, symbols: &[f64]) -> Vec<bool> {
        match self {
            ModulationScheme::Bpsk => demodulate_bpsk(symbols),
            ModulationScheme::Qpsk => demodulate_qpsk(symbols),
            ModulationScheme::Qam16 => demodulate_qam16(symbols),
        }
    }
}

impl fmt::Display for ModulationScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModulationScheme {
    type Err = ChannelSimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bpsk" => Ok(ModulationScheme::Bpsk),
            "qpsk" => Ok(ModulationScheme::Qpsk),
            "qam16" | "16qam" | "16-qam" => Ok(ModulationScheme::Qam16),
            other => Err(ChannelSimError::UnsupportedScheme(format!(
                "modulation '{}'",
                other
            ))),
        }
    }
}

/// Index order of the modulation selector: 0 = BPSK, 1 = QPSK, 2 = 16-QAM
impl TryFrom<u8> for ModulationScheme {
    type Error = ChannelSimError;

    fn try_from(index: u8) -> Result<Self> {
        Self::ALL.get(index as usize).copied().ok_or_else(|| {
            ChannelSimError::UnsupportedScheme(format!("modulation index {}", index))
        })
    }
}

fn modulate_bpsk(bits: &[bool]) -> Vec<f64> {
    bits.iter().map(|&b| if b { 1.0 } else { -1.0 }).collect()
}

fn modulate_qpsk(bits: &[bool]) -> Vec<f64> {
    let mut symbols = Vec::with_capacity(bits.len() / 2 * 2);
    for pair in bits.chunks_exact(2) {
        symbols.push(if pair[0] { QPSK_SCALE } else { -QPSK_SCALE });
        symbols.push(if pair[1] { QPSK_SCALE } else { -QPSK_SCALE });
    }
    symbols
}

fn qam16_level(b0: bool, b1: bool) -> f64 {
    QAM16_LEVELS[(b0 as usize) << 1 | b1 as usize] / QAM16_NORM
}

fn modulate_qam16(bits: &[bool]) -> Vec<f64> {
    let mut symbols = Vec::with_capacity(bits.len() / 4 * 4);
    for group in bits.chunks_exact(4) {
        let i = qam16_level(group[0], group[1]);
        let q = qam16_level(group[2], group[3]);
        // (I, Q) repeated in slots 3 and 4
        symbols.extend_from_slice(&[i, q, i, q]);
    }
    symbols
}

fn demodulate_bpsk(symbols: &[f64]) -> Vec<bool> {
    symbols.iter().map(|&s| s > 0.0).collect()
}

fn demodulate_qpsk(symbols: &[f64]) -> Vec<bool> {
    symbols
        .chunks_exact(2)
        .flat_map(|pair| [pair[0] > 0.0, pair[1] > 0.0])
        .collect()
}

/// Two-threshold slicer on one axis, returns (b0, b1)
fn slice_qam16_axis(value: f64) -> (bool, bool) {
    let level = value * QAM16_NORM;
    if level > QAM16_DECISION_LEVEL {
        (true, false)
    } else if level > 0.0 {
        (true, true)
    } else if level < -QAM16_DECISION_LEVEL {
        (false, false)
    } else {
        (false, true)
    }
}

fn demodulate_qam16(symbols: &[f64]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(symbols.len() / 4 * 4);
    for group in symbols.chunks_exact(4) {
        let (i0, i1) = slice_qam16_axis(group[0]);
        let (q0, q1) = slice_qam16_axis(group[1]);
        bits.extend_from_slice(&[i0, i1, q0, q1]);
    }
    bits
}
