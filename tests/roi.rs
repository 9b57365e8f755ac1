//! Region-of-interest construction, set operations and queries.

use anyhow::Result;
use ironlog::testing::*;
use ironlog::*;

fn s(seconds: f64) -> Timestamp {
    Timestamp::from_seconds(seconds)
}

#[test]
fn sentinels() {
    let all = TimeROI::use_all();
    assert!(all.is_use_all() && all.is_empty() && !all.is_use_none());
    assert!(all.value_at_time(s(-1e6)));
    assert_eq!(all.duration_in_seconds(), 0.0);
    assert_eq!(all.first_time(), None);
    assert_eq!(all.to_string(), "TimeROI(use all)");

    let none = TimeROI::use_none();
    assert!(none.is_use_none() && none.is_empty());
    assert!(!none.value_at_time(s(0.0)));
    assert_eq!(none.to_string(), "TimeROI(use none)");

    assert!(TimeROI::new(s(5.0), s(5.0)).is_use_none());
    assert!(TimeROI::from_intervals(Vec::new()).is_use_all());
    assert_eq!(TimeROI::default(), TimeROI::use_all());
}

#[test]
fn first_region_replaces_use_all() {
    let mut roi = TimeROI::use_all();
    roi.add_roi(s(10.0), s(20.0));
    assert!(!roi.is_use_all());
    assert_eq!(roi.boundaries(), &[s(10.0), s(20.0)]);

    // degenerate ranges change nothing
    roi.add_roi(s(40.0), s(30.0));
    assert_eq!(roi.number_of_regions(), 1);
}

#[test]
fn touching_and_overlapping_regions_merge() -> Result<()> {
    let mut roi = TimeROI::new(s(0.0), s(10.0));
    roi.add_roi(s(20.0), s(30.0));
    roi.add_roi(s(10.0), s(12.0));
    assert_eq!(roi.number_of_regions(), 2);
    assert_eq!(roi.region(0)?, TimeInterval::new(s(0.0), s(12.0)));

    roi.add_roi(s(11.0), s(25.0));
    assert_eq!(roi.number_of_regions(), 1);
    assert_eq!(roi.duration_in_seconds(), 30.0);
    assert_eq!(roi.num_boundaries(), 2);
    assert_eq!(roi.time_at_index(1)?, s(30.0));
    assert!(matches!(roi.time_at_index(2), Err(LogError::IndexOutOfRange { .. })));
    Ok(())
}

#[test]
fn regions_are_half_open() {
    let roi = TimeROI::new(s(10.0), s(20.0));
    assert!(roi.value_at_time(s(10.0)));
    assert!(roi.value_at_time(s(19.999)));
    assert!(!roi.value_at_time(s(20.0)));
    assert!(!roi.value_at_time(s(9.0)));
}

#[test]
fn masking_splits_and_empties() {
    let mut roi = TimeROI::new(s(0.0), s(30.0));
    roi.add_mask(s(10.0), s(20.0));
    assert_eq!(
        roi.to_time_intervals(),
        vec![TimeInterval::new(s(0.0), s(10.0)), TimeInterval::new(s(20.0), s(30.0))]
    );

    roi.add_mask(s(-5.0), s(50.0));
    assert!(roi.is_use_none());

    let mut all = TimeROI::use_all();
    all.add_mask(s(0.0), s(10.0));
    assert!(!all.value_at_time(s(5.0)));
    assert!(all.value_at_time(s(-5.0)));
    assert!(all.value_at_time(s(15.0)));
    assert_eq!(all.first_time(), Some(Timestamp::MIN));
    assert_eq!(all.last_time(), Some(Timestamp::MAX));
}

#[test]
fn union_adds_the_other_regions() {
    let mut a = TimeROI::new(s(0.0), s(10.0));
    let b = TimeROI::from_intervals([
        TimeInterval::new(s(5.0), s(15.0)),
        TimeInterval::new(s(30.0), s(40.0)),
    ]);
    a.update_union(&b);
    assert_eq!(a.to_string(), format!("TimeROI([{}, {}), [{}, {}))", s(0.0), s(15.0), s(30.0), s(40.0)));

    let before = a.clone();
    a.update_union(&TimeROI::use_all());
    assert_eq!(a, before);
}

#[test]
fn intersection_rules() {
    let a = TimeROI::from_intervals([
        TimeInterval::new(s(0.0), s(10.0)),
        TimeInterval::new(s(20.0), s(30.0)),
    ]);
    let b = TimeROI::new(s(5.0), s(25.0));

    let mut both = a.clone();
    both.update_intersection(&b);
    assert_eq!(
        both.to_time_intervals(),
        vec![TimeInterval::new(s(5.0), s(10.0)), TimeInterval::new(s(20.0), s(25.0))]
    );

    let mut unchanged = a.clone();
    unchanged.update_intersection(&TimeROI::use_all());
    assert_eq!(unchanged, a);

    let mut adopted = TimeROI::use_all();
    adopted.update_intersection(&b);
    assert_eq!(adopted, b);

    let mut disjoint = TimeROI::new(s(0.0), s(1.0));
    disjoint.update_intersection(&TimeROI::new(s(2.0), s(3.0)));
    assert!(disjoint.is_use_none());

    let mut none = a;
    none.update_intersection(&TimeROI::use_none());
    assert!(none.is_use_none());
}

#[test]
fn duration_within_window_and_containment() {
    let roi = TimeROI::from_intervals([
        TimeInterval::new(s(0.0), s(10.0)),
        TimeInterval::new(s(20.0), s(30.0)),
    ]);
    assert_eq!(roi.duration_in_seconds_within(s(5.0), s(25.0)), 10.0);
    assert_eq!(roi.duration_in_seconds_within(s(25.0), s(5.0)), 0.0);
    assert_eq!(TimeROI::use_all().duration_in_seconds_within(s(0.0), s(4.0)), 4.0);

    assert!(roi.is_completely_in_roi(s(1.0), s(10.0)));
    assert!(!roi.is_completely_in_roi(s(5.0), s(25.0)));
    assert!(!roi.is_completely_in_roi(s(10.0), s(12.0)));
}

#[test]
fn indices_of_sorted_times() {
    let roi = TimeROI::from_intervals([
        TimeInterval::new(s(0.0), s(10.0)),
        TimeInterval::new(s(12.0), s(14.0)),
        TimeInterval::new(s(20.0), s(30.0)),
    ]);
    let times: Vec<Timestamp> = (0..6).map(|i| s(f64::from(i) * 5.0)).collect();
    // 0, 5 | (nothing in 12..14) | 20, 25
    assert_eq!(roi.calculate_indices(&times), vec![(0, 2), (4, 6)]);
    assert_eq!(TimeROI::use_all().calculate_indices(&times), vec![(0, 6)]);
    assert!(TimeROI::use_none().calculate_indices(&times).is_empty());
}

#[test]
fn converts_to_filter_intervals() {
    let roi = TimeROI::from_intervals([
        TimeInterval::new(s(0.0), s(10.0)),
        TimeInterval::new(s(20.0), s(30.0)),
    ]);
    let set = roi.to_split_interval_set(0);
    assert!(set.is_filter());
    assert_intervals_eq(&set, &[(s(0.0), s(10.0), 0), (s(20.0), s(30.0), 0)]);
}

#[test]
fn trimming_a_log_to_an_roi() {
    let mut log = sample_double_log();
    let roi = TimeROI::new(ts("2007-11-30T16:17:15"), ts("2007-11-30T16:17:25"));

    assert_eq!(log.filtered_values_as_vector(&roi), vec![7.55, 5.55]);
    assert_eq!(
        log.filtered_times_as_vector(&roi),
        vec![ts("2007-11-30T16:17:10"), ts("2007-11-30T16:17:20")]
    );

    log.remove_data_outside_roi(&roi);
    assert_eq!(log.values_as_vector(), vec![7.55, 5.55]);

    log.remove_data_outside_roi(&TimeROI::use_all());
    assert_eq!(log.size(), 2);

    log.filter_by_time(ts("2007-11-30T16:20:00"), ts("2007-11-30T16:19:00"));
    assert!(log.is_empty());
}

#[test]
fn serde_round_trip() -> Result<()> {
    let roi = TimeROI::from_intervals([TimeInterval::new(s(0.0), s(10.0))]);
    let back: TimeROI = serde_json::from_str(&serde_json::to_string(&roi)?)?;
    assert_eq!(back, roi);
    Ok(())
}
