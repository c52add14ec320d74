//! Sorted duration collections.
//!
//! Every collection the model reads is sorted ascending once, at
//! construction, so windows and cumulative counts are located with binary
//! search instead of a scan per evaluation.

use statrs::statistics::Statistics;

/// Upper bound on a valid outage duration (24h, in milliseconds).
pub const MAX_DURATION_MS: u32 = 86_400_000;

/// An immutable, ascending sequence of outage durations in milliseconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Durations {
    sorted: Vec<f64>,
}

impl Durations {
    /// Build from raw millisecond values. Order of the input does not matter.
    pub fn from_millis(values: impl IntoIterator<Item = u32>) -> Self {
        let mut sorted: Vec<f64> = values.into_iter().map(f64::from).collect();
        sorted.sort_by(f64::total_cmp);
        Self { sorted }
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.sorted
    }

    /// Largest observed duration, if any.
    pub fn max(&self) -> Option<f64> {
        self.sorted.last().copied()
    }

    /// Number of durations `d` with `d <= bound`.
    pub fn count_at_most(&self, bound: f64) -> usize {
        self.sorted.partition_point(|&d| d <= bound)
    }

    /// Durations `d` with `start <= d <= end`. Empty when `start > end`.
    pub fn window(&self, start: f64, end: f64) -> &[f64] {
        let lo = self.sorted.partition_point(|&d| d < start);
        let hi = self.sorted.partition_point(|&d| d <= end);
        if lo >= hi {
            return &[];
        }
        &self.sorted[lo..hi]
    }

    /// Arithmetic mean of the window, or `None` when the window is empty.
    pub fn window_mean(&self, start: f64, end: f64) -> Option<f64> {
        mean(self.window(start, end))
    }
}

/// Mean of a non-empty slice; `None` instead of NaN for an empty one.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().mean())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_millis_sorts() {
        let d = Durations::from_millis([25, 5, 15]);
        assert_eq!(d.as_slice(), &[5.0, 15.0, 25.0]);
        assert_eq!(d.max(), Some(25.0));
    }

    #[test]
    fn test_window_is_inclusive_on_both_ends() {
        let d = Durations::from_millis([5, 10, 15, 20, 25]);
        assert_eq!(d.window(10.0, 20.0), &[10.0, 15.0, 20.0]);
        assert_eq!(d.window(11.0, 19.0), &[15.0]);
    }

    #[test]
    fn test_inverted_window_is_empty() {
        let d = Durations::from_millis([5, 15, 25]);
        assert!(d.window(30.0, 25.0).is_empty());
        assert_eq!(d.window_mean(30.0, 25.0), None);
    }

    #[test]
    fn test_count_at_most() {
        let d = Durations::from_millis([5, 15, 15, 25]);
        assert_eq!(d.count_at_most(4.0), 0);
        assert_eq!(d.count_at_most(15.0), 3);
        assert_eq!(d.count_at_most(1e9), 4);
    }

    #[test]
    fn test_mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[5.0, 15.0, 25.0]), Some(15.0));
    }
}
