//! GSM burst geometry and training sequences
//!
//! Constants from GSM 05.02: the eight 26-symbol training sequence codes
//! carried in the midamble of a normal burst, and the 41-symbol synch
//! sequence of an access (RACH) burst.
//!
//! **Normal burst layout** (148 active symbols):
//! - Positions 0-2: tail bits
//! - Positions 3-59: first data field + stealing flag
//! - Positions 61-86: training sequence (midamble)
//! - Positions 87-144: stealing flag + second data field
//! - Positions 145-147: tail bits
//!
//! **Access burst layout** (88 active symbols):
//! - Positions 0-7: extended tail bits
//! - Positions 8-48: synch sequence
//! - Positions 49-84: data field
//! - Positions 85-87: tail bits

/// Symbol periods in one timeslot (guard period truncated)
pub const SLOT_SYMBOLS: usize = 156;

/// Active symbols in a normal or EDGE burst
pub const NB_SYMBOLS: usize = 148;

/// Active symbols in an access burst
pub const AB_SYMBOLS: usize = 88;

/// Length of a normal-burst training sequence
pub const TSC_LEN: usize = 26;

/// First symbol of the midamble within a normal burst
pub const TSC_START: usize = 61;

/// Length of the access-burst synch sequence
pub const RACH_SYNCH_LEN: usize = 41;

/// First symbol of the synch sequence within an access burst
pub const RACH_SYNCH_START: usize = 8;

/// Number of coded bits per 8PSK symbol
pub const EDGE_BITS_PER_SYMBOL: usize = 3;

/// The eight standard training sequence codes (GSM 05.02 table 5.2.3)
pub const TRAIN_SEQ: [[u8; TSC_LEN]; 8] = [
    [0, 0, 1, 0, 0, 1, 0, 1, 1, 1, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 0, 1, 1, 1],
    [0, 0, 1, 0, 1, 1, 0, 1, 1, 1, 0, 1, 1, 1, 1, 0, 0, 0, 1, 0, 1, 1, 0, 1, 1, 1],
    [0, 1, 0, 0, 0, 0, 1, 1, 1, 0, 1, 1, 1, 0, 1, 0, 0, 1, 0, 0, 0, 0, 1, 1, 1, 0],
    [0, 1, 0, 0, 0, 1, 1, 1, 1, 0, 1, 1, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 1, 1, 1, 0],
    [0, 0, 0, 1, 1, 0, 1, 0, 1, 1, 1, 0, 0, 1, 0, 0, 0, 0, 0, 1, 1, 0, 1, 0, 1, 1],
    [0, 1, 0, 0, 1, 1, 1, 0, 1, 0, 1, 1, 0, 0, 0, 0, 0, 1, 0, 0, 1, 1, 1, 0, 1, 0],
    [1, 0, 1, 0, 0, 1, 1, 1, 1, 1, 0, 1, 1, 0, 0, 0, 1, 0, 1, 0, 0, 1, 1, 1, 1, 1],
    [1, 1, 1, 0, 1, 1, 1, 1, 0, 0, 0, 1, 0, 0, 1, 0, 1, 1, 1, 0, 1, 1, 1, 1, 0, 0],
];

/// Access-burst synch sequence (GSM 05.02 section 5.2.7)
pub const RACH_SYNCH_SEQ: [u8; RACH_SYNCH_LEN] = [
    0, 1, 0, 0, 1, 0, 1, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 1, 1,
    0, 0, 1, 1, 0, 1, 0, 1, 0, 1, 0, 0, 0, 1, 1, 1, 1, 0, 0, 0,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_seq_lengths() {
        for seq in &TRAIN_SEQ {
            assert_eq!(seq.len(), TSC_LEN);
            for &b in seq {
                assert!(b <= 1);
            }
        }
    }

    #[test]
    fn test_midamble_fits_in_burst() {
        assert!(TSC_START + TSC_LEN <= NB_SYMBOLS);
        assert!(RACH_SYNCH_START + RACH_SYNCH_LEN <= AB_SYMBOLS);
        assert!(NB_SYMBOLS <= SLOT_SYMBOLS);
    }
}
