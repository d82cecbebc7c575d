//! Price-pattern fractal utilities: a coarse box-counting dimension and
//! five-bar peak/valley detection.
//!
//! These are standalone helpers. They measure something different from the
//! MF-DFA spectrum and are not part of [`crate::signal::Signal`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Box-counting estimate `1 + ln(boxes) / ln(box_size)`.
///
/// The series is cut into `len / box_size` whole boxes. Returns 0 for an empty
/// series or a zero box size, and 1 when every box has zero price range
/// (including when no whole box fits).
///
/// # Example
/// ```rust
/// use fractal_signal::price_fractals::box_counting_dimension;
///
/// let flat = vec![5.0; 12];
/// assert_eq!(box_counting_dimension(&flat, 4), 1.0);
/// ```
pub fn box_counting_dimension(prices: &[f64], box_size: usize) -> f64 {
    if prices.is_empty() || box_size == 0 {
        return 0.0;
    }

    let boxes = prices.len() / box_size;
    let total_range: f64 = prices
        .chunks_exact(box_size)
        .map(|chunk| {
            let (lo, hi) = chunk
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| (lo.min(p), hi.max(p)));
            hi - lo
        })
        .sum();

    if total_range == 0.0 {
        return 1.0;
    }
    1.0 + (boxes as f64).ln() / (box_size as f64).ln()
}

/// Indices of five-bar peaks and valleys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PriceFractals {
    /// Bars strictly above both neighbours on each side
    pub peaks: Vec<usize>,
    /// Bars strictly below both neighbours on each side
    pub valleys: Vec<usize>,
}

/// Find Williams-style fractals: bar `i` is a peak when it is strictly higher
/// than bars `i±1` and `i±2`, a valley when strictly lower. The first and last
/// two bars are never candidates.
pub fn find_fractals(prices: &[f64]) -> PriceFractals {
    let mut fractals = PriceFractals::default();
    if prices.len() < 5 {
        return fractals;
    }

    for (k, bars) in prices.windows(5).enumerate() {
        let centre = bars[2];
        let others = [bars[0], bars[1], bars[3], bars[4]];
        if others.iter().all(|&p| centre > p) {
            fractals.peaks.push(k + 2);
        } else if others.iter().all(|&p| centre < p) {
            fractals.valleys.push(k + 2);
        }
    }
    log::trace!(
        "price fractals: {} peaks, {} valleys",
        fractals.peaks.len(),
        fractals.valleys.len()
    );
    fractals
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    const ZIGZAG: [f64; 24] = [
        100.0, 102.0, 103.0, 101.0, 99.0, 100.0, 102.0, 105.0, 104.0, 106.0, 103.0, 101.0, 100.0,
        102.0, 103.0, 101.0, 99.0, 100.0, 102.0, 105.0, 104.0, 106.0, 103.0, 101.0,
    ];

    #[test]
    fn test_box_counting_zigzag() {
        assert_approx_eq!(box_counting_dimension(&ZIGZAG, 6), 1.0 + 4f64.ln() / 6f64.ln());
    }

    #[test]
    fn test_box_counting_degenerate() {
        assert_eq!(box_counting_dimension(&[], 3), 0.0);
        assert_eq!(box_counting_dimension(&ZIGZAG, 0), 0.0);
        // No whole box fits
        assert_eq!(box_counting_dimension(&ZIGZAG[..4], 6), 1.0);
        // Single-bar boxes have no range
        assert_eq!(box_counting_dimension(&ZIGZAG, 1), 1.0);
    }

    #[test]
    fn test_find_fractals_zigzag() {
        let fractals = find_fractals(&ZIGZAG);
        assert_eq!(fractals.peaks, vec![2, 9, 14, 21]);
        assert_eq!(fractals.valleys, vec![4, 12, 16]);
    }

    #[test]
    fn test_find_fractals_short_and_monotone() {
        assert_eq!(find_fractals(&[1.0, 3.0, 1.0]), PriceFractals::default());
        let rising: Vec<f64> = (0..20).map(f64::from).collect();
        assert_eq!(find_fractals(&rising), PriceFractals::default());
    }
}
