//! Fixed-length complex burst buffer
//!
//! One received timeslot of I/Q samples: `156 × sps` complex values. The
//! classification/demodulation core only ever reads a burst; construction
//! happens at the edges (file ingestion or synthesis).

use num::complex::Complex32;
use snafu::Snafu;

use crate::sigproc::sequences::SLOT_SYMBOLS;

#[derive(Debug, Snafu)]
pub enum BurstError {
    /// Sample count does not match one timeslot at the given rate
    #[snafu(display("expected {expected} samples for sps {sps}, got {actual}"))]
    BadLength {
        sps: u32,
        expected: usize,
        actual: usize,
    },

    /// Byte stream is not a whole number of complex f32 samples
    #[snafu(display("raw burst bytes not a multiple of {}", 2 * core::mem::size_of::<f32>()))]
    RaggedBytes,
}

/// One timeslot of complex samples, read-only to the receive core.
#[derive(Debug, Clone)]
pub struct Burst {
    samples: Vec<Complex32>,
    sps: u32,
}

impl Burst {
    /// Number of complex samples in a burst at the given oversampling rate
    pub fn expected_len(sps: u32) -> usize {
        SLOT_SYMBOLS * sps as usize
    }

    pub fn new(samples: Vec<Complex32>, sps: u32) -> Result<Self, BurstError> {
        let expected = Self::expected_len(sps);
        if samples.len() != expected {
            return Err(BurstError::BadLength {
                sps,
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self { samples, sps })
    }

    /// Decode a raw interleaved little-endian f32 I/Q byte stream.
    pub fn from_le_bytes(bytes: &[u8], sps: u32) -> Result<Self, BurstError> {
        if bytes.len() % 8 != 0 {
            return Err(BurstError::RaggedBytes);
        }
        let samples: Vec<Complex32> = bytes
            .chunks_exact(8)
            .map(|c| {
                let re = f32::from_le_bytes([c[0], c[1], c[2], c[3]]);
                let im = f32::from_le_bytes([c[4], c[5], c[6], c[7]]);
                Complex32::new(re, im)
            })
            .collect();
        Self::new(samples, sps)
    }

    /// Serialize to the interleaved little-endian f32 I/Q format.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.samples.len() * 8);
        for s in &self.samples {
            bytes.extend_from_slice(&s.re.to_le_bytes());
            bytes.extend_from_slice(&s.im.to_le_bytes());
        }
        bytes
    }

    pub fn sps(&self) -> u32 {
        self.sps
    }

    pub fn samples(&self) -> &[Complex32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_len() {
        assert_eq!(Burst::expected_len(1), 156);
        assert_eq!(Burst::expected_len(4), 624);
    }

    #[test]
    fn test_length_checked() {
        let short = vec![Complex32::new(0.0, 0.0); 100];
        assert!(Burst::new(short, 1).is_err());

        let exact = vec![Complex32::new(0.0, 0.0); 156];
        assert!(Burst::new(exact, 1).is_ok());
    }

    #[test]
    fn test_bytes_round_trip() {
        let samples: Vec<Complex32> = (0..156)
            .map(|i| Complex32::new(i as f32, -(i as f32) * 0.5))
            .collect();
        let burst = Burst::new(samples, 1).unwrap();

        let bytes = burst.to_le_bytes();
        assert_eq!(bytes.len(), 156 * 8);

        let back = Burst::from_le_bytes(&bytes, 1).unwrap();
        assert_eq!(back.samples(), burst.samples());
    }

    #[test]
    fn test_ragged_bytes_rejected() {
        let bytes = vec![0u8; 156 * 8 + 3];
        assert!(matches!(
            Burst::from_le_bytes(&bytes, 1),
            Err(BurstError::RaggedBytes)
        ));
    }
}
