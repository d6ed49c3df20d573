//! Burst synthesis
//!
//! Generates baseband bursts with random payload bits for the `burstsim`
//! binary and for tests: GMSK normal and access bursts, 8PSK EDGE bursts,
//! plus amplitude scaling, sample delay and AWGN impairments. Pulse shaping
//! is rectangular (each symbol held for `sps` samples), matching the
//! receive-side reference waveforms.

use num::complex::Complex32;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};

use crate::burst::Burst;
use crate::sigproc::sequences::{
    AB_SYMBOLS, NB_SYMBOLS, RACH_SYNCH_SEQ, RACH_SYNCH_START, SLOT_SYMBOLS, TRAIN_SEQ, TSC_START,
};
use crate::sigproc::{edge_symbol, gmsk_symbol};

/// All-zero burst of one timeslot, noise and impairments to taste.
pub fn empty_burst(sps: u32) -> Burst {
    let samples = vec![Complex32::new(0.0, 0.0); Burst::expected_len(sps)];
    Burst::new(samples, sps).expect("slot-sized buffer")
}

/// Normal burst carrying training sequence `tsc` and random payload bits.
pub fn normal_burst(tsc: u32, sps: u32, rng: &mut impl Rng) -> Burst {
    let mut bits = [0u8; NB_SYMBOLS];
    for b in bits.iter_mut().take(61).skip(3) {
        *b = rng.random::<bool>() as u8;
    }
    bits[TSC_START..TSC_START + 26].copy_from_slice(&TRAIN_SEQ[(tsc as usize) & 0x7]);
    for b in bits.iter_mut().take(145).skip(87) {
        *b = rng.random::<bool>() as u8;
    }

    from_symbols(
        (0..NB_SYMBOLS).map(|k| gmsk_symbol(bits[k], k)),
        sps,
    )
}

/// Access burst with random payload bits after the synch sequence.
pub fn rach_burst(sps: u32, rng: &mut impl Rng) -> Burst {
    let mut bits = [0u8; AB_SYMBOLS];
    bits[RACH_SYNCH_START..RACH_SYNCH_START + RACH_SYNCH_SEQ.len()]
        .copy_from_slice(&RACH_SYNCH_SEQ);
    for b in bits.iter_mut().take(85).skip(49) {
        *b = rng.random::<bool>() as u8;
    }

    from_symbols(
        (0..AB_SYMBOLS).map(|k| gmsk_symbol(bits[k], k)),
        sps,
    )
}

/// EDGE burst: 8PSK payload with training sequence `tsc` mapped onto the
/// midamble one bit per symbol.
pub fn edge_burst(tsc: u32, sps: u32, rng: &mut impl Rng) -> Burst {
    let mut groups = [0u8; NB_SYMBOLS];
    for g in groups.iter_mut().take(61).skip(3) {
        *g = rng.random_range(0..8u8);
    }
    for (i, &b) in TRAIN_SEQ[(tsc as usize) & 0x7].iter().enumerate() {
        groups[TSC_START + i] = if b != 0 { 0x7 } else { 0 };
    }
    for g in groups.iter_mut().take(145).skip(87) {
        *g = rng.random_range(0..8u8);
    }

    from_symbols(
        (0..NB_SYMBOLS).map(|k| edge_symbol(groups[k], k)),
        sps,
    )
}

/// Scale every sample of a burst by `factor`.
pub fn scale(burst: &Burst, factor: f32) -> Burst {
    let samples = burst.samples().iter().map(|&s| s * factor).collect();
    Burst::new(samples, burst.sps()).expect("length preserved")
}

/// Delay a burst by a whole number of samples, zero-filling the head and
/// dropping what slides past the end of the slot.
pub fn delay(burst: &Burst, samples: usize) -> Burst {
    let len = burst.len();
    let mut delayed = vec![Complex32::new(0.0, 0.0); len];
    for (i, &s) in burst.samples().iter().enumerate() {
        if i + samples < len {
            delayed[i + samples] = s;
        }
    }
    Burst::new(delayed, burst.sps()).expect("length preserved")
}

/// Add complex white Gaussian noise with per-rail deviation `sigma`.
pub fn add_noise(burst: &mut Burst, sigma: f32, rng: &mut impl Rng) {
    if sigma <= 0.0 {
        return;
    }
    let normal = Normal::new(0.0f32, sigma).expect("positive sigma");
    let noisy = burst
        .samples()
        .iter()
        .map(|&s| s + Complex32::new(normal.sample(rng), normal.sample(rng)))
        .collect();
    *burst = Burst::new(noisy, burst.sps()).expect("length preserved");
}

/// Hold each symbol for `sps` samples and pad the guard period with zeros.
fn from_symbols(symbols: impl Iterator<Item = Complex32>, sps: u32) -> Burst {
    let mut samples = Vec::with_capacity(SLOT_SYMBOLS * sps as usize);
    for sym in symbols {
        for _ in 0..sps {
            samples.push(sym);
        }
    }
    samples.resize(SLOT_SYMBOLS * sps as usize, Complex32::new(0.0, 0.0));
    Burst::new(samples, sps).expect("slot-sized buffer")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_burst_lengths() {
        let mut rng = StdRng::seed_from_u64(40);
        assert_eq!(normal_burst(0, 1, &mut rng).len(), 156);
        assert_eq!(normal_burst(0, 4, &mut rng).len(), 624);
        assert_eq!(rach_burst(1, &mut rng).len(), 156);
        assert_eq!(edge_burst(0, 4, &mut rng).len(), 624);
    }

    #[test]
    fn test_guard_period_is_silent() {
        let mut rng = StdRng::seed_from_u64(41);
        let burst = normal_burst(0, 1, &mut rng);
        for &s in &burst.samples()[148..] {
            assert_eq!(s, Complex32::new(0.0, 0.0));
        }

        let rach = rach_burst(1, &mut rng);
        for &s in &rach.samples()[88..] {
            assert_eq!(s, Complex32::new(0.0, 0.0));
        }
    }

    #[test]
    fn test_delay_shifts_samples() {
        let mut rng = StdRng::seed_from_u64(42);
        let burst = normal_burst(0, 1, &mut rng);
        let delayed = delay(&burst, 3);

        assert_eq!(delayed.len(), burst.len());
        for i in 0..3 {
            assert_eq!(delayed.samples()[i], Complex32::new(0.0, 0.0));
        }
        assert_eq!(delayed.samples()[3], burst.samples()[0]);
    }

    #[test]
    fn test_scale_applies_factor() {
        let mut rng = StdRng::seed_from_u64(43);
        let burst = normal_burst(0, 1, &mut rng);
        let scaled = scale(&burst, 2.0);
        assert_eq!(scaled.samples()[10], burst.samples()[10] * 2.0);
    }

    #[test]
    fn test_noise_changes_samples() {
        let mut rng = StdRng::seed_from_u64(44);
        let mut burst = empty_burst(1);
        add_noise(&mut burst, 0.1, &mut rng);
        assert!(burst.samples().iter().any(|s| s.norm() > 0.0));
    }
}
