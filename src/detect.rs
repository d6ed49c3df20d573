//! Burst classification
//!
//! The ordered detection cascade: given the burst type a timeslot is
//! expected to carry, run the matching correlator and decide what actually
//! arrived. The one fallback rule lives here: a failed EDGE detection is
//! retried once as a normal burst, because legacy-modulation traffic can
//! arrive in a slot provisioned for 8PSK. The fallback never re-labels a
//! burst as EDGE, and no other type is ever reconsidered.

use num::complex::Complex32;
use snafu::Snafu;
use tracing::{debug, error, instrument};

use crate::burst::Burst;
use crate::config::TrxConfig;
use crate::sigproc::{correlate, SigError};

/// Detection threshold for normal and EDGE bursts
pub const NB_THRESHOLD: f32 = 5.0;

/// Detection threshold for access bursts. Higher than the normal-burst
/// threshold: a false RACH detection triggers a pointless channel
/// assignment, so the timing-uncertain access slots get a stricter test.
pub const AB_THRESHOLD: f32 = 6.0;

/// What a timeslot is expected, or was resolved, to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrType {
    /// Timeslot is off
    Off,
    /// Normal burst, verified against a training sequence
    Tsc,
    /// Access burst
    Rach,
    /// 8PSK burst, only meaningful at 4 samples per symbol
    Edge,
    /// Idle or dummy burst
    Idle,
}

impl std::fmt::Display for CorrType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CorrType::Off => "OFF",
            CorrType::Tsc => "TSC",
            CorrType::Rach => "RACH",
            CorrType::Edge => "EDGE",
            CorrType::Idle => "IDLE",
        };
        f.write_str(name)
    }
}

/// A classified burst with its channel estimates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// The type the burst was ultimately classified as
    pub cor_type: CorrType,
    /// Complex channel amplitude at the correlation peak
    pub amplitude: Complex32,
    /// Time of arrival in sample units
    pub toa: f32,
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum DetectError {
    /// Nothing above the detection threshold; expected for idle slots
    #[snafu(display("no burst detected"))]
    NoBurst,

    /// Input-stage saturation on the received burst
    #[snafu(display("clipping detected on received burst"))]
    ClippingDetected,

    /// A correlator failed for a reason the cascade has no policy for
    #[snafu(display("unhandled burst detection error"))]
    DetectionFailed,

    /// The requested type has no correlator
    #[snafu(display("invalid correlation type"))]
    InvalidType,
}

/// Classify one burst against the requested type.
#[instrument(skip(config, burst), fields(sps = config.rx_sps))]
pub fn detect_burst(
    config: &TrxConfig,
    burst: &Burst,
    requested: CorrType,
) -> Result<Detection, DetectError> {
    match requested {
        CorrType::Edge => {
            match correlate::detect_edge_burst(
                burst,
                config.rtsc,
                NB_THRESHOLD,
                config.rx_sps,
                config.max_expected_delay_nb,
            ) {
                Ok(corr) => {
                    debug!(score = corr.score, toa = corr.toa, "EDGE burst detected");
                    Ok(Detection {
                        cor_type: CorrType::Edge,
                        amplitude: corr.amplitude,
                        toa: corr.toa,
                    })
                }
                Err(e) => {
                    // Sole fallback rule: one secondary attempt as a
                    // normal burst, same burst, same threshold.
                    debug!(cause = %e, "EDGE detection failed, retrying as normal burst");
                    attempt_tsc(config, burst)
                }
            }
        }
        CorrType::Tsc => attempt_tsc(config, burst),
        CorrType::Rach => correlate::detect_rach_burst(
            burst,
            AB_THRESHOLD,
            config.rx_sps,
            config.max_expected_delay_ab,
        )
        .map(|corr| Detection {
            cor_type: CorrType::Rach,
            amplitude: corr.amplitude,
            toa: corr.toa,
        })
        .map_err(map_sig_error),
        CorrType::Idle => Err(DetectError::NoBurst),
        CorrType::Off => {
            error!("invalid correlation type {}", requested);
            Err(DetectError::InvalidType)
        }
    }
}

fn attempt_tsc(config: &TrxConfig, burst: &Burst) -> Result<Detection, DetectError> {
    correlate::detect_tsc_burst(
        burst,
        config.rtsc,
        NB_THRESHOLD,
        config.rx_sps,
        config.max_expected_delay_nb,
    )
    .map(|corr| Detection {
        cor_type: CorrType::Tsc,
        amplitude: corr.amplitude,
        toa: corr.toa,
    })
    .map_err(map_sig_error)
}

fn map_sig_error(e: SigError) -> DetectError {
    match e {
        SigError::NoBurst => DetectError::NoBurst,
        SigError::Clipping => DetectError::ClippingDetected,
        SigError::UnsupportedSps { .. } | SigError::DemodFailed => DetectError::DetectionFailed,
    }
}
