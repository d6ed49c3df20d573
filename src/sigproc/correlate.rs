//! Burst correlators
//!
//! Each correlator slides a known reference waveform (training sequence
//! midamble or RACH synch sequence) over a bounded lag window around its
//! nominal position, then applies a peak-to-average power test against the
//! caller's detection threshold.
//!
//! On success the peak yields a complex channel amplitude estimate and a
//! time of arrival in sample units, refined below sample resolution with a
//! three-point parabolic fit. A saturation check runs before any
//! correlation: a clipped front end makes every estimate unreliable.

use num::complex::Complex32;

use crate::burst::Burst;
use crate::sigproc::sequences::{
    RACH_SYNCH_SEQ, RACH_SYNCH_START, TRAIN_SEQ, TSC_START,
};
use crate::sigproc::{edge_symbol, gmsk_symbol, SigError, CLIP_LEVEL};

/// Result of a successful burst correlation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correlation {
    /// Detection metric: peak-to-average power ratio weighted by the
    /// normalized correlation at the peak
    pub score: f32,
    /// Complex channel amplitude estimate at the peak
    pub amplitude: Complex32,
    /// Time of arrival relative to the nominal burst start, in samples
    pub toa: f32,
}

/// Correlate a normal burst against training sequence `tsc`.
pub fn detect_tsc_burst(
    burst: &Burst,
    tsc: u32,
    threshold: f32,
    sps: u32,
    max_toa_symbols: u32,
) -> Result<Correlation, SigError> {
    let reference = midamble_reference(tsc, sps, false);
    detect_reference(burst, &reference, TSC_START, threshold, sps, max_toa_symbols)
}

/// Correlate an EDGE burst against the 8PSK mapping of training
/// sequence `tsc`.
pub fn detect_edge_burst(
    burst: &Burst,
    tsc: u32,
    threshold: f32,
    sps: u32,
    max_toa_symbols: u32,
) -> Result<Correlation, SigError> {
    let reference = midamble_reference(tsc, sps, true);
    detect_reference(burst, &reference, TSC_START, threshold, sps, max_toa_symbols)
}

/// Correlate an access burst against the RACH synch sequence.
pub fn detect_rach_burst(
    burst: &Burst,
    threshold: f32,
    sps: u32,
    max_toa_symbols: u32,
) -> Result<Correlation, SigError> {
    let mut reference = Vec::with_capacity(RACH_SYNCH_SEQ.len() * sps as usize);
    for (k, &bit) in RACH_SYNCH_SEQ.iter().enumerate() {
        let sym = gmsk_symbol(bit, RACH_SYNCH_START + k);
        for _ in 0..sps {
            reference.push(sym);
        }
    }
    detect_reference(
        burst,
        &reference,
        RACH_SYNCH_START,
        threshold,
        sps,
        max_toa_symbols,
    )
}

/// Reference waveform for the midamble of training sequence `tsc`,
/// rotated from the absolute burst start so the peak phase directly
/// estimates the channel.
fn midamble_reference(tsc: u32, sps: u32, edge: bool) -> Vec<Complex32> {
    let bits = &TRAIN_SEQ[(tsc as usize) & 0x7];
    let mut reference = Vec::with_capacity(bits.len() * sps as usize);
    for (k, &bit) in bits.iter().enumerate() {
        let sym = if edge {
            edge_symbol(if bit != 0 { 0x7 } else { 0 }, TSC_START + k)
        } else {
            gmsk_symbol(bit, TSC_START + k)
        };
        for _ in 0..sps {
            reference.push(sym);
        }
    }
    reference
}

fn detect_reference(
    burst: &Burst,
    reference: &[Complex32],
    start_symbol: usize,
    threshold: f32,
    sps: u32,
    max_toa_symbols: u32,
) -> Result<Correlation, SigError> {
    if sps != 1 && sps != 4 {
        return Err(SigError::UnsupportedSps { sps });
    }

    check_clipping(burst)?;

    let samples = burst.samples();
    let base = start_symbol * sps as usize;
    let max_lag = max_toa_symbols as usize * sps as usize;

    // Clamp the lag window so the reference stays inside the burst.
    let n_lags = samples
        .len()
        .saturating_sub(base + reference.len())
        .min(max_lag)
        + 1;
    if n_lags < 2 {
        return Err(SigError::NoBurst);
    }

    let corr_power: Vec<f32> = (0..n_lags)
        .map(|lag| cross_correlate(&samples[base + lag..], reference).norm_sqr())
        .collect();

    let (peak_lag, &peak_power) = corr_power
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal))
        .unwrap_or((0, &0.0));

    // Peak-to-average power ratio, excluding the main lobe around the peak.
    let guard = 2 * sps as usize;
    let mut sidelobe_sum = 0.0f32;
    let mut sidelobe_count = 0usize;
    for (lag, &p) in corr_power.iter().enumerate() {
        if lag.abs_diff(peak_lag) > guard {
            sidelobe_sum += p;
            sidelobe_count += 1;
        }
    }

    if peak_power <= 0.0 || sidelobe_count == 0 {
        return Err(SigError::NoBurst);
    }
    let mean_power = sidelobe_sum / sidelobe_count as f32;
    if mean_power <= 0.0 {
        return Err(SigError::NoBurst);
    }
    let par = peak_power / mean_power;

    // Weight by the normalized correlation at the peak. Noise and
    // mismatched-modulation bursts can throw up a sharp-looking peak, but
    // only a genuine training sequence correlates coherently across the
    // whole reference.
    let ref_energy: f32 = reference.iter().map(|r| r.norm_sqr()).sum();
    let seg = &samples[base + peak_lag..base + peak_lag + reference.len()];
    let seg_energy: f32 = seg.iter().map(|s| s.norm_sqr()).sum();
    if seg_energy <= 0.0 {
        return Err(SigError::NoBurst);
    }
    let rho2 = peak_power / (ref_energy * seg_energy);

    let score = par * rho2;
    tracing::debug!(score, par, rho2, peak_lag, threshold, "correlation peak");

    if score < threshold {
        return Err(SigError::NoBurst);
    }

    let amplitude = cross_correlate(&samples[base + peak_lag..], reference) / ref_energy;
    let toa = peak_lag as f32 + interpolate_peak(&corr_power, peak_lag);

    Ok(Correlation {
        score,
        amplitude,
        toa,
    })
}

fn cross_correlate(samples: &[Complex32], reference: &[Complex32]) -> Complex32 {
    reference
        .iter()
        .zip(samples)
        .map(|(r, s)| s * r.conj())
        .sum()
}

/// Three-point parabolic refinement of the peak position, in (-0.5, 0.5).
fn interpolate_peak(power: &[f32], peak: usize) -> f32 {
    if peak == 0 || peak + 1 >= power.len() {
        return 0.0;
    }
    let early = power[peak - 1];
    let center = power[peak];
    let late = power[peak + 1];

    let denom = early - 2.0 * center + late;
    if denom.abs() < f32::EPSILON {
        return 0.0;
    }
    (0.5 * (early - late) / denom).clamp(-0.5, 0.5)
}

fn check_clipping(burst: &Burst) -> Result<(), SigError> {
    let clipped = burst
        .samples()
        .iter()
        .any(|s| s.re.abs() > CLIP_LEVEL || s.im.abs() > CLIP_LEVEL);
    if clipped {
        Err(SigError::Clipping)
    } else {
        Ok(())
    }
}
