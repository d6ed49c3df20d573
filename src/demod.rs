//! Demodulation orchestrator
//!
//! One call processes exactly one burst: measure signal strength, run the
//! detection cascade, and hand the aligned burst to the demodulator that
//! matches the resolved type. RSSI is measured before classification and
//! reported even when nothing is detected; a power reading for an empty
//! slot is still useful to the caller.

use tracing::{debug, instrument, warn};

use crate::burst::Burst;
use crate::config::TrxConfig;
use crate::detect::{detect_burst, CorrType, DetectError};
use crate::sigproc::{demodulate, energy};

/// Soft bits and estimates for a successfully demodulated burst.
#[derive(Debug, Clone)]
pub struct Demodulated {
    /// The type the burst was classified as; overrides the requested type
    pub cor_type: CorrType,
    /// Time of arrival normalized to symbol units
    pub timing_offset: f32,
    /// One soft value per coded bit of the resolved burst type
    pub soft_bits: Vec<f32>,
}

/// Outcome of one orchestrator invocation.
///
/// `rssi` is always valid; `demod` is absent whenever detection or
/// demodulation gave up on this burst.
#[derive(Debug, Clone)]
pub struct BurstOutput {
    /// Received signal strength in dB relative to full scale
    pub rssi: f64,
    pub demod: Option<Demodulated>,
}

/// Classify and demodulate one burst.
#[instrument(skip(config, burst), fields(requested = %requested))]
pub fn demodulate_burst(
    config: &TrxConfig,
    burst: &Burst,
    sps: u32,
    requested: CorrType,
) -> BurstOutput {
    // Average power over the leading edge, independent of whatever the
    // cascade decides below.
    let avg = energy::average_amplitude(burst, 20 * config.rx_sps as usize, 0.0);
    let rssi = 20.0 * (config.rx_full_scale / f64::from(avg.max(f32::MIN_POSITIVE))).log10();

    let detection = match detect_burst(config, burst, requested) {
        Ok(d) => d,
        Err(DetectError::ClippingDetected) => {
            warn!("clipping detected on received RACH or normal burst");
            return BurstOutput { rssi, demod: None };
        }
        Err(DetectError::NoBurst) => {
            // Expected for idle slots; nothing to report.
            return BurstOutput { rssi, demod: None };
        }
        Err(DetectError::InvalidType) => {
            // Already logged at error level by the cascade.
            return BurstOutput { rssi, demod: None };
        }
        Err(e @ DetectError::DetectionFailed) => {
            warn!(cause = %e, "unhandled burst detection error");
            return BurstOutput { rssi, demod: None };
        }
    };

    let timing_offset = detection.toa / sps as f32;
    debug!(
        cor_type = %detection.cor_type,
        timing_offset,
        amplitude = detection.amplitude.norm(),
        "burst detected"
    );

    let soft_bits = match detection.cor_type {
        CorrType::Edge => demodulate::demod_edge_burst(
            burst,
            config.rx_sps,
            detection.amplitude,
            detection.toa,
        ),
        _ => demodulate::demod_gmsk_burst(
            burst,
            config.rx_sps,
            detection.amplitude,
            detection.toa,
        ),
    };

    match soft_bits {
        Ok(soft_bits) => BurstOutput {
            rssi,
            demod: Some(Demodulated {
                cor_type: detection.cor_type,
                timing_offset,
                soft_bits,
            }),
        },
        Err(e) => {
            warn!(cause = %e, "demodulation failed");
            BurstOutput { rssi, demod: None }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sigproc::energy::average_amplitude;
    use crate::synth;
    use crate::tracing_init::init_test_tracing;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(sps: u32, rtsc: u32) -> TrxConfig {
        TrxConfig {
            rx_sps: sps,
            rtsc,
            ..Default::default()
        }
    }

    #[test]
    fn test_tsc_burst_demodulated() {
        init_test_tracing();
        let mut rng = StdRng::seed_from_u64(80);
        let burst = synth::normal_burst(0, 1, &mut rng);
        let config = config(1, 0);

        let out = demodulate_burst(&config, &burst, 1, CorrType::Tsc);
        let demod = out.demod.expect("soft bits");
        assert_eq!(demod.cor_type, CorrType::Tsc);
        assert_eq!(demod.soft_bits.len(), 148);
        assert!(demod.timing_offset.abs() < 1.0);

        // RSSI comes straight from the leading-window average.
        let avg = average_amplitude(&burst, 20, 0.0);
        let expected = 20.0 * (config.rx_full_scale / f64::from(avg)).log10();
        assert!((out.rssi - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rssi_is_deterministic_and_detection_independent() {
        init_test_tracing();
        let mut rng = StdRng::seed_from_u64(81);
        let burst = synth::normal_burst(0, 1, &mut rng);
        let config = config(1, 0);

        let as_tsc = demodulate_burst(&config, &burst, 1, CorrType::Tsc);
        let as_idle = demodulate_burst(&config, &burst, 1, CorrType::Idle);
        assert_eq!(as_tsc.rssi, as_idle.rssi);
        assert!(as_tsc.demod.is_some());
        assert!(as_idle.demod.is_none());
    }

    #[test]
    fn test_timing_offset_normalized_by_sps() {
        init_test_tracing();
        let mut rng = StdRng::seed_from_u64(82);
        let burst = synth::delay(&synth::normal_burst(0, 4, &mut rng), 8);

        let out = demodulate_burst(&config(4, 0), &burst, 4, CorrType::Tsc);
        let demod = out.demod.expect("soft bits");
        // 8 samples at 4 samples per symbol = 2 symbol periods.
        assert!((demod.timing_offset - 2.0).abs() < 0.5);
    }

    #[test]
    fn test_edge_fallback_uses_generic_demodulator() {
        init_test_tracing();
        let mut rng = StdRng::seed_from_u64(83);
        let burst = synth::normal_burst(1, 4, &mut rng);
        let config = TrxConfig {
            rx_sps: 4,
            rtsc: 1,
            edge: true,
            ..Default::default()
        };

        let out = demodulate_burst(&config, &burst, 4, CorrType::Edge);
        let demod = out.demod.expect("soft bits");
        assert_eq!(demod.cor_type, CorrType::Tsc);
        // Generic demodulator output, not 444 EDGE soft bits.
        assert_eq!(demod.soft_bits.len(), 148);
    }

    #[test]
    fn test_edge_burst_gets_edge_soft_bits() {
        init_test_tracing();
        let mut rng = StdRng::seed_from_u64(84);
        let burst = synth::edge_burst(3, 4, &mut rng);
        let config = TrxConfig {
            rx_sps: 4,
            rtsc: 3,
            edge: true,
            ..Default::default()
        };

        let out = demodulate_burst(&config, &burst, 4, CorrType::Edge);
        let demod = out.demod.expect("soft bits");
        assert_eq!(demod.cor_type, CorrType::Edge);
        assert_eq!(demod.soft_bits.len(), 444);
    }

    #[test]
    fn test_clipped_burst_yields_rssi_but_no_bits() {
        init_test_tracing();
        let mut rng = StdRng::seed_from_u64(85);
        let burst = synth::scale(&synth::normal_burst(0, 1, &mut rng), 40000.0);

        let out = demodulate_burst(&config(1, 0), &burst, 1, CorrType::Tsc);
        assert!(out.demod.is_none());
        assert!(out.rssi.is_finite());
    }

    #[test]
    fn test_rach_on_empty_slot_is_silent_absence() {
        init_test_tracing();
        let mut rng = StdRng::seed_from_u64(86);
        let mut burst = synth::empty_burst(1);
        synth::add_noise(&mut burst, 0.2, &mut rng);

        let out = demodulate_burst(&config(1, 0), &burst, 1, CorrType::Rach);
        assert!(out.demod.is_none());
    }

    #[test]
    fn test_off_request_aborts() {
        init_test_tracing();
        let burst = synth::empty_burst(1);
        let out = demodulate_burst(&config(1, 0), &burst, 1, CorrType::Off);
        assert!(out.demod.is_none());
    }
}
