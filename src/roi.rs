//! Regions of interest in time.
//!
//! A [`TimeROI`] is a canonical set of disjoint `[start, stop)` regions stored
//! as one flat, strictly increasing boundary list: even indices open a region,
//! odd indices close it. Two sentinel states exist:
//!
//! - **use all**: no boundaries recorded, every time is included. This is also
//!   the neutral starting state, so the first [`TimeROI::add_roi`] replaces it.
//! - **use none**: explicitly marked, no time is included.

use crate::error::{LogError, Result};
use crate::interval::{SplitInterval, SplitIntervalSet};
use crate::time::{TimeInterval, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeROI {
    boundaries: Vec<Timestamp>,
    use_none: bool,
}

impl TimeROI {
    /// The "no restriction" sentinel.
    #[must_use]
    pub const fn use_all() -> Self {
        Self { boundaries: Vec::new(), use_none: false }
    }

    /// The "exclude everything" sentinel.
    #[must_use]
    pub const fn use_none() -> Self {
        Self { boundaries: Vec::new(), use_none: true }
    }

    /// A single region. A degenerate or reversed range yields [`TimeROI::use_none`].
    #[must_use]
    pub fn new(start: Timestamp, stop: Timestamp) -> Self {
        if start < stop {
            Self { boundaries: vec![start, stop], use_none: false }
        } else {
            Self::use_none()
        }
    }

    /// Union of the given ranges. Degenerate ranges are ignored; if none is
    /// left the result is [`TimeROI::use_all`].
    pub fn from_intervals<I: IntoIterator<Item = TimeInterval>>(intervals: I) -> Self {
        let mut roi = Self::use_all();
        for interval in intervals {
            roi.add_roi(interval.start, interval.stop);
        }
        roi
    }

    #[must_use]
    pub fn is_use_all(&self) -> bool {
        !self.use_none && self.boundaries.is_empty()
    }

    #[must_use]
    pub const fn is_use_none(&self) -> bool {
        self.use_none
    }

    /// Both sentinels report `true`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /* ---------------- mutation ---------------- */

    /// Include `[start, stop)`, merging with any region it touches.
    ///
    /// Degenerate or reversed ranges are ignored.
    pub fn add_roi(&mut self, start: Timestamp, stop: Timestamp) {
        if start >= stop {
            return;
        }
        if self.use_none {
            self.use_none = false;
            self.boundaries.clear();
        }
        // Fast path: strictly after everything recorded so far.
        if self.boundaries.last().is_none_or(|last| start > *last) {
            self.boundaries.push(start);
            self.boundaries.push(stop);
            return;
        }
        let mut regions = self.to_time_intervals();
        regions.push(TimeInterval::new(start, stop));
        self.set_regions(regions);
    }

    /// Exclude `[start, stop)`.
    ///
    /// Masking [`TimeROI::use_all`] leaves everything outside the mask; masking
    /// away the last region yields [`TimeROI::use_none`].
    pub fn add_mask(&mut self, start: Timestamp, stop: Timestamp) {
        if start >= stop || self.use_none {
            return;
        }
        let mask = TimeInterval::new(start, stop);
        let current = if self.is_use_all() {
            vec![TimeInterval::new(Timestamp::MIN, Timestamp::MAX)]
        } else {
            self.to_time_intervals()
        };
        let mut kept = Vec::with_capacity(current.len() + 1);
        for region in current {
            if !region.overlaps(&mask) {
                kept.push(region);
                continue;
            }
            kept.push(TimeInterval::new(region.start, mask.start));
            kept.push(TimeInterval::new(mask.stop, region.stop));
        }
        self.set_regions(kept);
    }

    /// Union with `other`. Only `other`'s regions are added: unioning with a
    /// sentinel changes nothing.
    pub fn update_union(&mut self, other: &Self) {
        if self == other {
            return;
        }
        for region in other.to_time_intervals() {
            self.add_roi(region.start, region.stop);
        }
    }

    /// Restrict to the time shared with `other`.
    ///
    /// [`TimeROI::use_all`] on either side leaves the other side; an empty
    /// overlap yields [`TimeROI::use_none`].
    pub fn update_intersection(&mut self, other: &Self) {
        if self == other || other.is_use_all() {
            return;
        }
        if self.is_use_all() {
            self.replace_roi(other);
            return;
        }
        if self.use_none || other.use_none {
            *self = Self::use_none();
            return;
        }
        let ours = self.to_time_intervals();
        let theirs = other.to_time_intervals();
        // Both lists are sorted and disjoint: a two-cursor sweep suffices.
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < ours.len() && j < theirs.len() {
            if let Some(shared) = ours[i].intersection(&theirs[j]) {
                out.push(shared);
            }
            if ours[i].stop <= theirs[j].stop {
                i += 1;
            } else {
                j += 1;
            }
        }
        self.set_regions(out);
    }

    pub fn replace_roi(&mut self, other: &Self) {
        self.clone_from(other);
    }

    // Canonicalise: drop degenerate, sort, merge touching regions.
    fn set_regions(&mut self, mut regions: Vec<TimeInterval>) {
        regions.retain(TimeInterval::is_valid);
        regions.sort_by_key(|r| r.start);
        self.boundaries.clear();
        for region in regions {
            match self.boundaries.last_mut() {
                Some(stop) if region.start <= *stop => {
                    if region.stop > *stop {
                        *stop = region.stop;
                    }
                }
                _ => {
                    self.boundaries.push(region.start);
                    self.boundaries.push(region.stop);
                }
            }
        }
        self.use_none = self.boundaries.is_empty();
    }

    /* ---------------- queries ---------------- */

    /// Whether `t` is included.
    #[must_use]
    pub fn value_at_time(&self, t: Timestamp) -> bool {
        if self.use_none {
            return false;
        }
        if self.boundaries.is_empty() {
            return true;
        }
        self.boundaries.partition_point(|b| *b <= t) % 2 == 1
    }

    /// Start of the first region; `None` for the sentinels.
    #[must_use]
    pub fn first_time(&self) -> Option<Timestamp> {
        self.boundaries.first().copied()
    }

    /// End of the last region; `None` for the sentinels.
    #[must_use]
    pub fn last_time(&self) -> Option<Timestamp> {
        self.boundaries.last().copied()
    }

    /// The `index`-th boundary.
    ///
    /// # Errors
    /// [`LogError::IndexOutOfRange`].
    pub fn time_at_index(&self, index: usize) -> Result<Timestamp> {
        self.boundaries
            .get(index)
            .copied()
            .ok_or(LogError::IndexOutOfRange { index, len: self.boundaries.len() })
    }

    /// The `index`-th region.
    ///
    /// # Errors
    /// [`LogError::IndexOutOfRange`].
    pub fn region(&self, index: usize) -> Result<TimeInterval> {
        self.boundaries
            .chunks_exact(2)
            .nth(index)
            .map(|pair| TimeInterval::new(pair[0], pair[1]))
            .ok_or(LogError::IndexOutOfRange { index, len: self.number_of_regions() })
    }

    #[must_use]
    pub fn num_boundaries(&self) -> usize {
        self.boundaries.len()
    }

    #[must_use]
    pub fn number_of_regions(&self) -> usize {
        self.boundaries.len() / 2
    }

    #[must_use]
    pub fn boundaries(&self) -> &[Timestamp] {
        &self.boundaries
    }

    /// Total included time in seconds; `0` for both sentinels.
    #[must_use]
    pub fn duration_in_seconds(&self) -> f64 {
        self.regions().map(|r| r.duration_seconds()).sum()
    }

    /// Included time within `[start, stop)`, in seconds.
    #[must_use]
    pub fn duration_in_seconds_within(&self, start: Timestamp, stop: Timestamp) -> f64 {
        let window = TimeInterval::new(start, stop);
        if !window.is_valid() || self.use_none {
            return 0.0;
        }
        if self.is_use_all() {
            return window.duration_seconds();
        }
        self.regions()
            .filter_map(|r| r.intersection(&window))
            .map(|r| r.duration_seconds())
            .sum()
    }

    /// `true` when `[start, stop)` lies inside a single region.
    #[must_use]
    pub fn is_completely_in_roi(&self, start: Timestamp, stop: Timestamp) -> bool {
        if self.use_none {
            return false;
        }
        if self.boundaries.is_empty() {
            return true;
        }
        let i = self.boundaries.partition_point(|b| *b <= start);
        i % 2 == 1 && stop <= self.boundaries[i]
    }

    #[must_use]
    pub fn to_time_intervals(&self) -> Vec<TimeInterval> {
        self.regions().collect()
    }

    /// Every region as a [`SplitInterval`] routed to `destination`.
    #[must_use]
    pub fn to_split_interval_set(&self, destination: i32) -> SplitIntervalSet {
        self.regions()
            .map(|r| SplitInterval::new(r.start, r.stop, destination))
            .collect()
    }

    /// For sorted `times`, the half-open index range `[first, last)` of the
    /// times that fall inside each region. Regions holding no time are
    /// skipped.
    #[must_use]
    pub fn calculate_indices(&self, times: &[Timestamp]) -> Vec<(usize, usize)> {
        if self.use_none || times.is_empty() {
            return Vec::new();
        }
        if self.boundaries.is_empty() {
            return vec![(0, times.len())];
        }
        let mut out = Vec::with_capacity(self.number_of_regions());
        let mut cursor = 0;
        for region in self.regions() {
            let first = cursor + times[cursor..].partition_point(|t| *t < region.start);
            let last = first + times[first..].partition_point(|t| *t < region.stop);
            if last > first {
                out.push((first, last));
            }
            cursor = last;
        }
        out
    }

    fn regions(&self) -> impl Iterator<Item = TimeInterval> + '_ {
        self.boundaries
            .chunks_exact(2)
            .map(|pair| TimeInterval::new(pair[0], pair[1]))
    }
}

impl fmt::Display for TimeROI {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.use_none {
            return f.write_str("TimeROI(use none)");
        }
        if self.boundaries.is_empty() {
            return f.write_str("TimeROI(use all)");
        }
        f.write_str("TimeROI(")?;
        for (i, region) in self.regions().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{region}")?;
        }
        f.write_str(")")
    }
}
