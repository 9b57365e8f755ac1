//! Destination-tagged intervals and their set algebra.
//!
//! A [`SplitIntervalSet`] is either a *filter* (every destination `<= 0`,
//! meaning "keep") or a *splitter* (a real partition over several
//! destinations). The distinction is made at use time by
//! [`SplitIntervalSet::is_filter`], never by type.
//!
//! | operator      | meaning                                                      |
//! |---------------|--------------------------------------------------------------|
//! | `a & b`       | pairwise intersection, destination from the left operand     |
//! | `a \| b`      | merged union, destination `0`                                |
//! | `!a`          | complement within `[Timestamp::MIN, Timestamp::MAX)`         |
//! | `&a + &b`     | apply the filter side to the splitter side                   |

use crate::error::{LogError, Result};
use crate::roi::TimeROI;
use crate::time::{TimeInterval, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, Not};

/// `[start, stop)` routed to `destination`.
///
/// `start < stop` is not enforced; degenerate intervals are legal and the set
/// algebra drops them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SplitInterval {
    start: Timestamp,
    stop: Timestamp,
    destination: i32,
}

impl SplitInterval {
    #[inline]
    #[must_use]
    pub const fn new(start: Timestamp, stop: Timestamp, destination: i32) -> Self {
        Self { start, stop, destination }
    }

    #[inline]
    #[must_use]
    pub const fn start(&self) -> Timestamp {
        self.start
    }

    #[inline]
    #[must_use]
    pub const fn stop(&self) -> Timestamp {
        self.stop
    }

    #[inline]
    #[must_use]
    pub const fn destination(&self) -> i32 {
        self.destination
    }

    #[inline]
    #[must_use]
    pub const fn interval(&self) -> TimeInterval {
        TimeInterval::new(self.start, self.stop)
    }

    #[inline]
    #[must_use]
    pub fn duration_seconds(&self) -> f64 {
        self.stop.seconds_since(self.start)
    }

    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.start < self.stop
    }

    /// Strict overlap: sharing only an endpoint does not count.
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.stop && other.start < self.stop
    }

    /// Overlap or a shared endpoint.
    #[inline]
    #[must_use]
    pub fn touches(&self, other: &Self) -> bool {
        self.start <= other.stop && other.start <= self.stop
    }
}

impl BitAnd for SplitInterval {
    type Output = Self;

    /// Intersection; the destination comes from `self`. The result may be
    /// degenerate when the operands do not overlap.
    fn bitand(self, rhs: Self) -> Self {
        Self::new(self.start.max(rhs.start), self.stop.min(rhs.stop), self.destination)
    }
}

impl BitOr for SplitInterval {
    type Output = Result<Self>;

    /// Hull of two touching or overlapping intervals; the destination comes
    /// from `self`.
    fn bitor(self, rhs: Self) -> Result<Self> {
        if !self.touches(&rhs) {
            return Err(LogError::DisjointIntervals {
                a_start: self.start,
                a_stop: self.stop,
                b_start: rhs.start,
                b_stop: rhs.stop,
            });
        }
        Ok(Self::new(self.start.min(rhs.start), self.stop.max(rhs.stop), self.destination))
    }
}

impl fmt::Display for SplitInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}) -> {}", self.start, self.stop, self.destination)
    }
}

/* ==================== SplitIntervalSet ==================== */

/// An ordered, possibly overlapping collection of [`SplitInterval`]s.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitIntervalSet {
    intervals: Vec<SplitInterval>,
}

impl SplitIntervalSet {
    #[must_use]
    pub const fn new() -> Self {
        Self { intervals: Vec::new() }
    }

    pub fn push(&mut self, interval: SplitInterval) {
        self.intervals.push(interval);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SplitInterval> {
        self.intervals.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[SplitInterval] {
        &self.intervals
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<SplitInterval> {
        self.intervals
    }

    /// # Errors
    /// [`LogError::IndexOutOfRange`].
    pub fn get(&self, index: usize) -> Result<&SplitInterval> {
        self.intervals
            .get(index)
            .ok_or(LogError::IndexOutOfRange { index, len: self.intervals.len() })
    }

    /// `true` when every destination is `<= 0`. The empty set is a filter.
    #[must_use]
    pub fn is_filter(&self) -> bool {
        self.intervals.iter().all(|i| i.destination <= 0)
    }

    #[must_use]
    pub fn is_splitter(&self) -> bool {
        !self.is_filter()
    }

    /// Stable sort by start time.
    pub fn sort_by_start(&mut self) {
        self.intervals.sort_by_key(SplitInterval::start);
    }

    /// Drop degenerate intervals and merge the rest where they touch or
    /// overlap. Every merged interval gets destination `0`.
    #[must_use]
    pub fn remove_overlap(&self) -> Self {
        let mut valid: Vec<SplitInterval> =
            self.intervals.iter().copied().filter(SplitInterval::is_valid).collect();
        valid.sort_by_key(SplitInterval::start);

        let mut merged: Vec<SplitInterval> = Vec::with_capacity(valid.len());
        for interval in valid {
            match merged.last_mut() {
                Some(current) if interval.start <= current.stop => {
                    current.stop = current.stop.max(interval.stop);
                }
                _ => merged.push(SplitInterval::new(interval.start, interval.stop, 0)),
            }
        }
        Self { intervals: merged }
    }

    /// Pairwise intersection in `self`-major order. Only non-degenerate
    /// intersections are kept; each takes its destination from `self`.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut out = Vec::new();
        for a in &self.intervals {
            for b in &other.intervals {
                let shared = *a & *b;
                if shared.is_valid() {
                    out.push(shared);
                }
            }
        }
        Self { intervals: out }
    }

    /// Merged union of both sets; destination `0`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.intervals
            .iter()
            .chain(&other.intervals)
            .copied()
            .collect::<Self>()
            .remove_overlap()
    }

    /// Everything the merged set does not cover, bounded by the
    /// [`Timestamp::MIN`]/[`Timestamp::MAX`] sentinels.
    #[must_use]
    pub fn complement(&self) -> Self {
        let mut out = Vec::new();
        let mut cursor = Timestamp::MIN;
        for interval in self.remove_overlap().iter() {
            if cursor < interval.start {
                out.push(SplitInterval::new(cursor, interval.start, 0));
            }
            cursor = interval.stop;
        }
        if cursor < Timestamp::MAX {
            out.push(SplitInterval::new(cursor, Timestamp::MAX, 0));
        }
        Self { intervals: out }
    }

    /// Apply a filter to a splitter (or intersect two filters).
    ///
    /// The filter is always the right operand of the intersection, so the
    /// destinations of the splitter survive.
    ///
    /// # Errors
    /// [`LogError::AmbiguousCombination`] when both sides are splitters.
    pub fn combine(&self, other: &Self) -> Result<Self> {
        match (self.is_filter(), other.is_filter()) {
            (false, false) => Err(LogError::AmbiguousCombination),
            (true, false) => Ok(other.intersection(self)),
            _ => Ok(self.intersection(other)),
        }
    }
}

/// Group `set` by destination, one [`TimeROI`] per distinct destination
/// (negative ones included). Degenerate intervals are skipped, so a
/// destination that only has degenerate intervals gets no entry.
#[must_use]
pub fn time_rois_from_splitters(set: &SplitIntervalSet) -> BTreeMap<i32, TimeROI> {
    let mut rois: BTreeMap<i32, TimeROI> = BTreeMap::new();
    for interval in set.iter().filter(|i| i.is_valid()) {
        rois.entry(interval.destination)
            .or_default()
            .add_roi(interval.start, interval.stop);
    }
    rois
}

/* ---------------- operators ---------------- */

impl BitAnd for &SplitIntervalSet {
    type Output = SplitIntervalSet;
    fn bitand(self, rhs: Self) -> SplitIntervalSet {
        self.intersection(rhs)
    }
}

impl BitAnd for SplitIntervalSet {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        self.intersection(&rhs)
    }
}

impl BitOr for &SplitIntervalSet {
    type Output = SplitIntervalSet;
    fn bitor(self, rhs: Self) -> SplitIntervalSet {
        self.union(rhs)
    }
}

impl BitOr for SplitIntervalSet {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(&rhs)
    }
}

impl Not for &SplitIntervalSet {
    type Output = SplitIntervalSet;
    fn not(self) -> SplitIntervalSet {
        self.complement()
    }
}

impl Not for SplitIntervalSet {
    type Output = Self;
    fn not(self) -> Self {
        self.complement()
    }
}

impl Add for &SplitIntervalSet {
    type Output = Result<SplitIntervalSet>;
    fn add(self, rhs: Self) -> Result<SplitIntervalSet> {
        self.combine(rhs)
    }
}

/* ---------------- conversions ---------------- */

impl FromIterator<SplitInterval> for SplitIntervalSet {
    fn from_iter<I: IntoIterator<Item = SplitInterval>>(iter: I) -> Self {
        Self { intervals: iter.into_iter().collect() }
    }
}

impl Extend<SplitInterval> for SplitIntervalSet {
    fn extend<I: IntoIterator<Item = SplitInterval>>(&mut self, iter: I) {
        self.intervals.extend(iter);
    }
}

impl From<Vec<SplitInterval>> for SplitIntervalSet {
    fn from(intervals: Vec<SplitInterval>) -> Self {
        Self { intervals }
    }
}

impl<'a> IntoIterator for &'a SplitIntervalSet {
    type Item = &'a SplitInterval;
    type IntoIter = std::slice::Iter<'a, SplitInterval>;
    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

impl IntoIterator for SplitIntervalSet {
    type Item = SplitInterval;
    type IntoIter = std::vec::IntoIter<SplitInterval>;
    fn into_iter(self) -> Self::IntoIter {
        self.intervals.into_iter()
    }
}

impl fmt::Display for SplitIntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for interval in &self.intervals {
            writeln!(f, "{interval}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn si(a: i64, b: i64, d: i32) -> SplitInterval {
        SplitInterval::new(Timestamp::from_nanos(a), Timestamp::from_nanos(b), d)
    }

    #[test]
    fn interval_or_accepts_touching() {
        assert_eq!((si(0, 10, 3) | si(10, 20, 5)).unwrap(), si(0, 20, 3));
        assert!((si(0, 10, 0) | si(11, 20, 0)).is_err());
    }

    #[test]
    fn set_and_drops_degenerate_and_reversed() {
        let a: SplitIntervalSet = vec![si(10, 5, 1), si(0, 10, 2)].into();
        let b: SplitIntervalSet = vec![si(0, 20, 0), si(10, 30, 0)].into();
        assert_eq!((&a & &b).into_vec(), vec![si(0, 10, 2)]);
    }

    #[test]
    fn complement_of_empty_is_all_time() {
        let all = !SplitIntervalSet::new();
        assert_eq!(all.into_vec(), vec![SplitInterval::new(Timestamp::MIN, Timestamp::MAX, 0)]);
    }

    #[test]
    fn two_splitters_are_ambiguous() {
        let a: SplitIntervalSet = vec![si(0, 10, 1)].into();
        let b: SplitIntervalSet = vec![si(0, 10, 2)].into();
        assert_eq!(&a + &b, Err(LogError::AmbiguousCombination));
    }
}
