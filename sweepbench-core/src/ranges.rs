//! Parameter Ranges
//!
//! `Range` walks a single arithmetic progression; `MultiRange` walks the
//! Cartesian product of several ranges like an odometer, with the last
//! dimension turning fastest:
//!
//! ```text
//! [1,3,1] x [1,3,1]  ->  (1,1) (1,2) (1,3) (2,1) (2,2) ... (3,3)
//! ```

use serde::{Deserialize, Serialize};
use std::collections::TryReserveError;
use thiserror::Error;

/// Errors raised while producing a parameter point
#[derive(Debug, Error)]
pub enum RangeError {
    /// The output vector could not be allocated
    #[error("Cannot allocate a {dimensions}-dimensional parameter vector: {source}")]
    Allocation {
        /// Dimension count of the vector being built
        dimensions: usize,
        /// Underlying reservation failure
        #[source]
        source: TryReserveError,
    },
}

/// Single-dimension range over `[start, end]` advancing by `step`.
///
/// `next` advances before it yields, so a freshly started range produces
/// `start + step`, `start + 2 * step`, ... and stops once the value is
/// strictly greater than `end` (a value equal to `end` is still produced).
///
/// A `step` of zero, or a negative `step`, never stops. That is a caller
/// error and is not guarded against.
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    /// First value of the progression
    pub start: f64,
    /// Inclusive upper bound
    pub end: f64,
    /// Increment between values
    pub step: f64,
    current: f64,
    /// Set by `MultiRange::start`: the next `next` yields `start` itself
    primed: bool,
}

impl Range {
    /// Create a range positioned at `start`
    pub fn new(start: f64, end: f64, step: f64) -> Self {
        Self {
            start,
            end,
            step,
            current: start,
            primed: false,
        }
    }

    /// Reset the generator state so the range can be (re)iterated
    pub fn start(&mut self) {
        self.current = self.start;
        self.primed = false;
    }

    /// Reset so that the next `next` yields `start` exactly.
    ///
    /// Stands in for pulling `current` back by one step, which does not
    /// round-trip in floating point.
    fn prime(&mut self) {
        self.start();
        self.primed = true;
    }

    /// Current generator value
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Number of values `next` yields after `start`, `None` if the range never stops.
    ///
    /// Counted by replaying the accumulation, so rounding in `current += step`
    /// is reflected exactly.
    pub fn len(&self) -> Option<usize> {
        if self.step.is_nan() || self.step <= 0.0 {
            return None;
        }
        let mut replay = self.clone();
        replay.start();
        let mut count = 0usize;
        loop {
            let before = replay.current;
            match replay.next() {
                None => return Some(count),
                // Too small to move `current`: the range never reaches `end`
                Some(value) if value <= before => return None,
                Some(_) => count += 1,
            }
        }
    }

    /// Whether `next` yields nothing after `start`
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }
}

impl Iterator for Range {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.primed {
            self.primed = false;
        } else {
            self.current += self.step;
        }
        // `>` is false for NaN, matching an unordered "is greater" test
        if self.current > self.end {
            return None;
        }
        Some(self.current)
    }
}

/// One point of a `MultiRange`, one value per dimension
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector {
    values: Vec<f64>,
}

impl Vector {
    /// Zero-dimensional vector, used for functions without parameters
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of dimensions
    pub fn dimensions(&self) -> usize {
        self.values.len()
    }

    /// Values, dimension 0 first
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value of dimension `index`
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Take the values out of the vector
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

impl From<Vec<f64>> for Vector {
    fn from(values: Vec<f64>) -> Self {
        Self { values }
    }
}

/// Odometer over several independent ranges.
///
/// Call [`MultiRange::start`] before iterating, then [`MultiRange::next_vector`]
/// until it returns `Ok(None)`. Once exhausted, the odometer has to be
/// started again to replay the same sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiRange {
    ranges: Vec<Range>,
}

impl MultiRange {
    /// Build from an ordered list of ranges, dimension 0 first
    pub fn new(ranges: Vec<Range>) -> Self {
        Self { ranges }
    }

    /// Build from the first `dimensions` entries of `items`
    pub fn from_slice(dimensions: usize, items: &[Range]) -> Self {
        items.iter().take(dimensions).cloned().collect()
    }

    /// Number of dimensions
    pub fn dimensions(&self) -> usize {
        self.ranges.len()
    }

    /// The ranges, dimension 0 first
    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    /// Total number of points one pass produces, `None` if any dimension is unbounded.
    ///
    /// Exact when every range has `start <= end`; each dimension contributes
    /// its `start` plus the [`Range::len`] values that follow.
    pub fn point_count(&self) -> Option<usize> {
        if self.ranges.is_empty() {
            return Some(0);
        }
        self.ranges.iter().try_fold(1usize, |acc, range| {
            let per_dim = range.len()?.checked_add(1)?;
            acc.checked_mul(per_dim)
        })
    }

    /// Reset every dimension.
    ///
    /// The last dimension is primed so that the first `next_vector` call
    /// lands on `(start_0, ..., start_n)` exactly.
    pub fn start(&mut self) {
        for range in &mut self.ranges {
            range.start();
        }
        if let Some(last) = self.ranges.last_mut() {
            last.prime();
        }
    }

    /// Advance to the next point.
    ///
    /// Returns `Ok(None)` once every combination has been produced and
    /// `Err` if the output vector cannot be allocated.
    pub fn next_vector(&mut self) -> Result<Option<Vector>, RangeError> {
        let mut dim = self.ranges.len();
        loop {
            let Some(idx) = dim.checked_sub(1) else {
                return Ok(None);
            };
            let range = &mut self.ranges[idx];
            if range.next().is_some() {
                break;
            }
            // Carry into the dimension on the left
            range.start();
            dim = idx;
        }

        let dimensions = self.ranges.len();
        let mut values = Vec::new();
        values
            .try_reserve_exact(dimensions)
            .map_err(|source| RangeError::Allocation { dimensions, source })?;
        values.extend(self.ranges.iter().map(Range::current));

        Ok(Some(Vector::from(values)))
    }
}

impl FromIterator<Range> for MultiRange {
    fn from_iter<I: IntoIterator<Item = Range>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<Range>> for MultiRange {
    fn from(ranges: Vec<Range>) -> Self {
        Self::new(ranges)
    }
}

/// Build a [`MultiRange`] from a list of `(start, end, step)` triples.
///
/// ```
/// use sweepbench_core::multi_range;
///
/// let grid = multi_range![(1.0, 3.0, 1.0), (0.0, 1.0, 0.5)];
/// assert_eq!(grid.dimensions(), 2);
/// ```
#[macro_export]
macro_rules! multi_range {
    ($(($start:expr, $end:expr, $step:expr)),+ $(,)?) => {
        $crate::MultiRange::new(vec![$($crate::Range::new($start, $end, $step)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: f64 = 10.0;
    const RANGE_LEN: usize = 10;

    fn collect_all(range: &mut MultiRange) -> Vec<Vec<f64>> {
        let mut points = Vec::new();
        range.start();
        while let Some(v) = range.next_vector().unwrap() {
            points.push(v.into_values());
        }
        points
    }

    #[test]
    fn test_range_iteration() {
        for i in 0..100 {
            let start = i as f64;
            let end = start + RANGE_LEN as f64 * STEP;
            let mut range = Range::new(start, end, STEP);
            range.start();
            assert_eq!(range.current(), start);

            for j in 0..RANGE_LEN {
                let value = range.next().unwrap();
                assert_eq!(value, range.current());
                assert_eq!(value, start + STEP * (j + 1) as f64);
                assert_eq!(range.start, start);
                assert_eq!(range.end, end);
                assert_eq!(range.step, STEP);
            }

            assert_eq!(range.next(), None);
        }
    }

    #[test]
    fn test_range_yields_end_inclusive() {
        let mut range = Range::new(0.0, 1.0, 0.5);
        range.start();
        assert_eq!(range.next(), Some(0.5));
        assert_eq!(range.next(), Some(1.0));
        assert_eq!(range.next(), None);
        assert_eq!(range.len(), Some(2));
    }

    #[test]
    fn test_range_len_matches_yield_count() {
        let cases = [
            (0.0, 10.0, 1.0),
            (5.0, 50.0, 7.0),
            (2.0, 2.0, 1.0),
            (3.0, 1.0, 1.0),
            (0.0, 0.6, 0.1),
            (0.1, 1.5, 0.7),
            (0.0, 1.0, 0.1),
        ];
        for (start, end, step) in cases {
            let mut range = Range::new(start, end, step);
            range.start();
            let yielded = range.by_ref().count();
            assert_eq!(Some(yielded), range.len(), "({start}, {end}, {step})");
        }
    }

    #[test]
    fn test_point_count_matches_ticks_for_decimal_steps() {
        for mut range in [
            multi_range![(0.0, 0.6, 0.1)],
            multi_range![(0.0, 1.0, 1.0), (0.1, 1.5, 0.7)],
            multi_range![(0.0, 0.3, 0.1), (0.0, 1.0, 0.1)],
        ] {
            let points = collect_all(&mut range);
            assert_eq!(range.point_count(), Some(points.len()));
        }
    }

    #[test]
    fn test_unmovable_step_is_unbounded() {
        // 1e20 + 1 == 1e20, so `next` never advances
        let range = Range::new(1e20, 2e20, 1.0);
        assert_eq!(range.len(), None);
    }

    #[test]
    fn test_first_point_carries_exact_start() {
        let mut range = multi_range![(0.0, 1.0, 1.0), (0.1, 1.5, 0.7)];
        let points = collect_all(&mut range);
        assert_eq!(points[0], vec![0.0, 0.1]);
        // Same logical point of the last dimension after a carry
        let carried = points.iter().find(|p| p[0] == 1.0).unwrap();
        assert_eq!(carried, &vec![1.0, 0.1]);
    }

    #[test]
    fn test_zero_step_never_stops() {
        let mut range = Range::new(1.0, 2.0, 0.0);
        range.start();
        assert!(range.by_ref().take(1000).all(|v| v == 1.0));
        assert_eq!(range.len(), None);
    }

    #[test]
    fn test_multi_range_counts() {
        let template = Range::new(10.0, 50.0, 10.0);
        let items = vec![template; 6];

        for d in 1..=5 {
            let mut range = MultiRange::from_slice(d, &items);
            assert_eq!(range.dimensions(), d);
            range.start();

            let expected = 5usize.pow(d as u32);
            for _ in 0..expected {
                let v = range.next_vector().unwrap().unwrap();
                assert_eq!(v.dimensions(), d);
            }
            assert!(range.next_vector().unwrap().is_none());
            assert_eq!(range.point_count(), Some(expected));
        }
    }

    #[test]
    fn test_multi_range_order() {
        let mut range = multi_range![(1.0, 3.0, 1.0), (1.0, 3.0, 1.0), (1.0, 3.0, 1.0)];
        assert_eq!(range.dimensions(), 3);
        assert_eq!(range.ranges()[0], Range::new(1.0, 3.0, 1.0));

        let points = collect_all(&mut range);
        assert_eq!(points.len(), 27);
        assert_eq!(points[0], vec![1.0, 1.0, 1.0]);
        assert_eq!(points[1], vec![1.0, 1.0, 2.0]);
        assert_eq!(points[2], vec![1.0, 1.0, 3.0]);
        assert_eq!(points[3], vec![1.0, 2.0, 1.0]);
        assert_eq!(points[26], vec![3.0, 3.0, 3.0]);

        // Mixed-radix decomposition of the tick index, last dimension fastest
        for (k, point) in points.iter().enumerate() {
            let expected = vec![
                1.0 + (k / 9) as f64,
                1.0 + (k / 3 % 3) as f64,
                1.0 + (k % 3) as f64,
            ];
            assert_eq!(point, &expected);
        }
    }

    #[test]
    fn test_multi_range_mixed_radix() {
        let mut range = multi_range![(0.0, 1.0, 1.0), (0.0, 0.5, 0.25), (10.0, 13.0, 1.0)];
        let points = collect_all(&mut range);
        assert_eq!(points.len(), 2 * 3 * 4);
        assert_eq!(range.point_count(), Some(24));
        assert_eq!(points[5], vec![0.0, 0.25, 11.0]);
        assert_eq!(points[23], vec![1.0, 0.5, 13.0]);
    }

    #[test]
    fn test_multi_range_restart_replays() {
        let mut range = multi_range![(1.0, 2.0, 1.0), (0.0, 4.0, 2.0)];
        let first = collect_all(&mut range);
        let second = collect_all(&mut range);
        assert_eq!(first.len(), 6);
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_range_restart_replays() {
        let mut range = Range::new(0.0, 3.0, 1.0);
        range.start();
        let first: Vec<f64> = range.by_ref().collect();
        range.start();
        let second: Vec<f64> = range.by_ref().collect();
        assert_eq!(first, vec![1.0, 2.0, 3.0]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_multi_range_stops() {
        let mut range = MultiRange::new(Vec::new());
        range.start();
        assert!(range.next_vector().unwrap().is_none());
        assert_eq!(range.point_count(), Some(0));
    }

    #[test]
    fn test_single_dimension_includes_start() {
        let mut range = multi_range![(5.0, 7.0, 1.0)];
        let points = collect_all(&mut range);
        assert_eq!(points, vec![vec![5.0], vec![6.0], vec![7.0]]);
    }

    #[test]
    fn test_vector_accessors() {
        let v = Vector::from(vec![1.5, 2.5]);
        assert_eq!(v.dimensions(), 2);
        assert_eq!(v.get(1), Some(2.5));
        assert_eq!(v.get(2), None);
        assert_eq!(Vector::empty().dimensions(), 0);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[1.5,2.5]");
    }
}
