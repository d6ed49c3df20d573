//! Soft-bit demodulators
//!
//! Both demodulators take an unaligned burst plus the channel amplitude and
//! time-of-arrival estimates from a correlator, equalize to unit gain, and
//! emit one soft value per coded bit. Positive soft values favor a
//! transmitted one; samples falling outside the buffer demodulate to 0
//! (an erasure for the outer decoder).

use num::complex::Complex32;
use std::f32::consts::PI;

use crate::burst::Burst;
use crate::sigproc::sequences::{EDGE_BITS_PER_SYMBOL, NB_SYMBOLS};
use crate::sigproc::{edge_rotation, gmsk_rotation, SigError, PSK8_BITS};

/// Demodulate a GMSK (normal or access) burst into 148 soft bits.
pub fn demod_gmsk_burst(
    burst: &Burst,
    sps: u32,
    amp: Complex32,
    toa: f32,
) -> Result<Vec<f32>, SigError> {
    let inv_amp = invert_amplitude(amp)?;
    let samples = burst.samples();
    let shift = toa.round() as isize;

    let mut soft = Vec::with_capacity(NB_SYMBOLS);
    for k in 0..NB_SYMBOLS {
        let idx = k as isize * sps as isize + shift;
        let Some(&s) = usize::try_from(idx).ok().and_then(|i| samples.get(i)) else {
            soft.push(0.0);
            continue;
        };
        let y = s * inv_amp * gmsk_rotation(k).conj();
        soft.push(-y.re);
    }
    Ok(soft)
}

/// Demodulate an EDGE (8PSK) burst into 444 soft bits, three per symbol.
pub fn demod_edge_burst(
    burst: &Burst,
    sps: u32,
    amp: Complex32,
    toa: f32,
) -> Result<Vec<f32>, SigError> {
    let inv_amp = invert_amplitude(amp)?;
    let samples = burst.samples();
    let shift = toa.round() as isize;

    let mut soft = Vec::with_capacity(NB_SYMBOLS * EDGE_BITS_PER_SYMBOL);
    for k in 0..NB_SYMBOLS {
        let idx = k as isize * sps as isize + shift;
        let Some(&s) = usize::try_from(idx).ok().and_then(|i| samples.get(i)) else {
            soft.extend_from_slice(&[0.0; EDGE_BITS_PER_SYMBOL]);
            continue;
        };
        let y = s * inv_amp * edge_rotation(k).conj();
        soft.extend_from_slice(&psk8_soft_bits(y));
    }
    Ok(soft)
}

/// Per-bit soft decision for one 8PSK symbol, MSB first.
///
/// For each bit, the difference between the squared distance to the
/// nearest constellation point carrying a 0 and the nearest carrying a 1.
fn psk8_soft_bits(y: Complex32) -> [f32; EDGE_BITS_PER_SYMBOL] {
    let mut d0 = [f32::MAX; EDGE_BITS_PER_SYMBOL];
    let mut d1 = [f32::MAX; EDGE_BITS_PER_SYMBOL];

    for (m, &bits) in PSK8_BITS.iter().enumerate() {
        let point = Complex32::from_polar(1.0, PI / 4.0 * m as f32);
        let dist = (y - point).norm_sqr();
        for i in 0..EDGE_BITS_PER_SYMBOL {
            if bits >> (EDGE_BITS_PER_SYMBOL - 1 - i) & 1 == 0 {
                d0[i] = d0[i].min(dist);
            } else {
                d1[i] = d1[i].min(dist);
            }
        }
    }

    [d0[0] - d1[0], d0[1] - d1[1], d0[2] - d1[2]]
}

fn invert_amplitude(amp: Complex32) -> Result<Complex32, SigError> {
    let power = amp.norm_sqr();
    if power < f32::EPSILON {
        return Err(SigError::DemodFailed);
    }
    Ok(amp.conj() / power)
}
