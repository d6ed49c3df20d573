//! Transceiver configuration
//!
//! Built once from command-line input, validated before any burst is
//! processed, then passed by shared reference into every call. Validation
//! failures are fatal at the CLI boundary: a rejected config never reaches
//! burst processing.

use snafu::Snafu;

#[derive(Debug, Snafu)]
pub enum ConfigError {
    /// Oversampling rate outside the supported set
    #[snafu(display("unsupported samples-per-symbol {sps} (must be 1 or 4)"))]
    UnsupportedSps { sps: u32 },

    /// EDGE demodulation needs the finer sample resolution
    #[snafu(display("EDGE only supported at 4 samples per symbol"))]
    EdgeNeedsSps4,

    /// Training sequence index outside [0, 7]
    #[snafu(display("invalid training sequence {rtsc}"))]
    InvalidTrainSeq { rtsc: u32 },
}

/// Receive-side configuration for the burst decision core.
#[derive(Debug, Clone)]
pub struct TrxConfig {
    /// Log filter level for the tracing subscriber
    pub log_level: String,
    /// Receive oversampling rate, 1 or 4
    pub rx_sps: u32,
    /// Training sequence index expected in normal bursts, 0-7
    pub rtsc: u32,
    /// Max expected delay for normal/EDGE bursts, in symbols
    pub max_expected_delay_nb: u32,
    /// Max expected delay for access bursts, in symbols
    pub max_expected_delay_ab: u32,
    /// Receiver full-scale amplitude, reference for RSSI
    pub rx_full_scale: f64,
    /// EDGE receiver enabled
    pub edge: bool,
}

impl Default for TrxConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            rx_sps: 1,
            rtsc: 0,
            max_expected_delay_nb: 30,
            max_expected_delay_ab: 30,
            rx_full_scale: i16::MAX as f64,
            edge: false,
        }
    }
}

impl TrxConfig {
    /// Check the invariants the rest of the core relies on.
    ///
    /// Must pass before any burst is handed to detection or demodulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rx_sps != 1 && self.rx_sps != 4 {
            return Err(ConfigError::UnsupportedSps { sps: self.rx_sps });
        }

        if self.edge && self.rx_sps != 4 {
            return Err(ConfigError::EdgeNeedsSps4);
        }

        if self.rtsc > 7 {
            return Err(ConfigError::InvalidTrainSeq { rtsc: self.rtsc });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(TrxConfig::default().validate().is_ok());
    }

    #[test]
    fn test_sps_must_be_1_or_4() {
        for sps in [1u32, 4] {
            let config = TrxConfig {
                rx_sps: sps,
                ..Default::default()
            };
            assert!(config.validate().is_ok(), "sps {} should be valid", sps);
        }

        for sps in [0u32, 2, 3, 5, 8] {
            let config = TrxConfig {
                rx_sps: sps,
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::UnsupportedSps { .. })),
                "sps {} should be rejected",
                sps
            );
        }
    }

    #[test]
    fn test_edge_requires_sps4() {
        let config = TrxConfig {
            edge: true,
            rx_sps: 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EdgeNeedsSps4)
        ));

        let config = TrxConfig {
            edge: true,
            rx_sps: 4,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_train_seq_range() {
        for rtsc in 0..=7 {
            let config = TrxConfig {
                rtsc,
                ..Default::default()
            };
            assert!(config.validate().is_ok());
        }

        let config = TrxConfig {
            rtsc: 8,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTrainSeq { rtsc: 8 })
        ));
    }
}
