//! Averaged burst amplitude
//!
//! RSSI feeds off the average amplitude over the leading edge of the burst,
//! so the estimate must not depend on whether classification later succeeds.

use crate::burst::Burst;
use num::complex::Complex32;

/// RMS amplitude of the first `window` samples of the burst, after
/// removing an assumed DC offset.
///
/// The window is clamped to the burst length; an empty window yields 0.
pub fn average_amplitude(burst: &Burst, window: usize, dc_offset: f32) -> f32 {
    let samples = burst.samples();
    let n = window.min(samples.len());
    if n == 0 {
        return 0.0;
    }

    let dc = Complex32::new(dc_offset, dc_offset);
    let power: f32 = samples[..n].iter().map(|&s| (s - dc).norm_sqr()).sum();

    (power / n as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::burst::Burst;

    fn constant_burst(value: Complex32) -> Burst {
        Burst::new(vec![value; 156], 1).unwrap()
    }

    #[test]
    fn test_constant_amplitude() {
        let burst = constant_burst(Complex32::new(3.0, 4.0));
        let avg = average_amplitude(&burst, 20, 0.0);
        assert!((avg - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_burst() {
        let burst = constant_burst(Complex32::new(0.0, 0.0));
        assert_eq!(average_amplitude(&burst, 20, 0.0), 0.0);
    }

    #[test]
    fn test_window_clamped() {
        let burst = constant_burst(Complex32::new(1.0, 0.0));
        let avg = average_amplitude(&burst, 10_000, 0.0);
        assert!((avg - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dc_offset_removed() {
        let burst = constant_burst(Complex32::new(2.5, 2.5));
        let avg = average_amplitude(&burst, 20, 2.5);
        assert!(avg < 1e-6);
    }

    #[test]
    fn test_window_restricts_to_leading_samples() {
        let mut samples = vec![Complex32::new(1.0, 0.0); 156];
        for s in samples.iter_mut().skip(20) {
            *s = Complex32::new(100.0, 0.0);
        }
        let burst = Burst::new(samples, 1).unwrap();
        let avg = average_amplitude(&burst, 20, 0.0);
        assert!((avg - 1.0).abs() < 1e-5);
    }
}
