//! Signal processing primitives
//!
//! The correlation, energy and demodulation building blocks underneath the
//! burst decision core. GMSK is approximated as MSK with a π/2 per-symbol
//! rotation; EDGE is 8PSK with a 3π/8 per-symbol rotation.
//!
//! **Module organization**:
//! - `sequences` - burst geometry and training sequence tables
//! - `energy` - averaged burst amplitude
//! - `correlate` - midamble/synch correlators (amplitude + TOA estimation)
//! - `demodulate` - GMSK and 8PSK soft-bit demodulators

pub mod correlate;
pub mod demodulate;
pub mod energy;
pub mod sequences;

pub use correlate::{detect_edge_burst, detect_rach_burst, detect_tsc_burst, Correlation};
pub use demodulate::{demod_edge_burst, demod_gmsk_burst};
pub use energy::average_amplitude;

use num::complex::Complex32;
use snafu::Snafu;
use std::f32::consts::PI;

/// Sample magnitude (per I/Q rail) above which the input stage is
/// considered clipped, on the i16 full-scale the receiver delivers.
pub const CLIP_LEVEL: f32 = 30000.0;

/// Status of a correlation or demodulation primitive.
#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum SigError {
    /// No correlation peak above the detection threshold
    #[snafu(display("no burst detected"))]
    NoBurst,

    /// Input-stage saturation detected before correlation
    #[snafu(display("clipping detected"))]
    Clipping,

    /// Oversampling rate the primitives cannot handle
    #[snafu(display("unsupported samples-per-symbol {sps}"))]
    UnsupportedSps { sps: u32 },

    /// Degenerate channel estimate, demodulation impossible
    #[snafu(display("demodulation failed"))]
    DemodFailed,
}

/// 3-bit group carried at each 8PSK constellation index.
///
/// Gray ordering: walking the constellation circle flips exactly one
/// payload bit per step, so the most likely symbol errors cost one bit.
pub const PSK8_BITS: [u8; 8] = [0, 1, 3, 2, 6, 7, 5, 4];

/// Inverse of [`PSK8_BITS`]: constellation index for a 3-bit group.
pub const PSK8_INDEX: [u8; 8] = [0, 1, 3, 2, 7, 6, 4, 5];

/// MSK-rotated symbol for one bit at absolute symbol position `k`.
///
/// Bit 0 maps to +1, bit 1 to -1, then the carrier advances π/2 per symbol.
#[inline]
pub fn gmsk_symbol(bit: u8, k: usize) -> Complex32 {
    let a = 1.0 - 2.0 * bit as f32;
    a * gmsk_rotation(k)
}

/// Per-symbol GMSK carrier rotation exp(jπk/2).
#[inline]
pub fn gmsk_rotation(k: usize) -> Complex32 {
    match k % 4 {
        0 => Complex32::new(1.0, 0.0),
        1 => Complex32::new(0.0, 1.0),
        2 => Complex32::new(-1.0, 0.0),
        _ => Complex32::new(0.0, -1.0),
    }
}

/// 8PSK symbol for a 3-bit group at absolute symbol position `k`,
/// including the EDGE 3π/8 per-symbol rotation.
#[inline]
pub fn edge_symbol(bits: u8, k: usize) -> Complex32 {
    let m = PSK8_INDEX[(bits & 0x7) as usize] as f32;
    let phase = PI / 4.0 * m;
    Complex32::from_polar(1.0, phase) * edge_rotation(k)
}

/// Per-symbol EDGE carrier rotation exp(j·3πk/8).
#[inline]
pub fn edge_rotation(k: usize) -> Complex32 {
    Complex32::from_polar(1.0, 3.0 * PI / 8.0 * k as f32)
}
