//! Split interval algebra: AND, OR, NOT and PLUS.

use anyhow::Result;
use ironlog::testing::*;
use ironlog::*;

fn at(offset: &str) -> Timestamp {
    ts(&format!("2007-11-30T{offset}"))
}

#[test]
fn single_interval_and_or() -> Result<()> {
    let a = SplitInterval::new(at("16:17:10"), at("16:17:20"), 0);
    let b = SplitInterval::new(at("16:17:12"), at("16:17:18"), 0);

    let both = a & b;
    assert_eq!((both.start(), both.stop()), (at("16:17:12"), at("16:17:18")));

    let either = (a | b)?;
    assert_eq!((either.start(), either.stop()), (at("16:17:10"), at("16:17:20")));

    let touching = SplitInterval::new(at("16:17:20"), at("16:17:30"), 0);
    let hull = (a | touching)?;
    assert_eq!(hull.duration_seconds(), 20.0);
    Ok(())
}

#[test]
fn or_of_disjoint_intervals_is_an_error() {
    let a = SplitInterval::new(at("16:17:00"), at("16:17:10"), 0);
    let b = SplitInterval::new(at("16:17:30"), at("16:17:42"), 0);
    let err = (a | b).unwrap_err();
    assert!(matches!(err, LogError::DisjointIntervals { .. }));
    assert!(err.to_string().contains("non-overlapping"));
}

#[test]
fn set_or_keeps_disjoint_intervals_apart() {
    let a: SplitIntervalSet = vec![SplitInterval::new(at("16:17:00"), at("16:17:10"), 0)].into();
    let b: SplitIntervalSet = vec![SplitInterval::new(at("16:17:30"), at("16:17:42"), 0)].into();

    let both = &a | &b;
    assert_intervals_eq(
        &both,
        &[
            (at("16:17:00"), at("16:17:10"), 0),
            (at("16:17:30"), at("16:17:42"), 0),
        ],
    );
}

#[test]
fn set_or_merges_touching_intervals() {
    let a = IntervalSetBuilder::new()
        .interval(0.0, 10.0, 0)
        .interval(30.0, 40.0, 0)
        .build();
    let b = IntervalSetBuilder::new().interval(10.0, 20.0, 0).build();

    let merged = a | b;
    let s = Timestamp::from_seconds;
    assert_intervals_eq(&merged, &[(s(0.0), s(20.0), 0), (s(30.0), s(40.0), 0)]);
}

#[test]
fn set_and_drops_empty_intersections() {
    let a = IntervalSetBuilder::new()
        .interval(0.0, 10.0, 0)
        .interval(20.0, 30.0, 0)
        .build();
    let b = IntervalSetBuilder::new()
        .interval(5.0, 25.0, 0)
        .interval(30.0, 50.0, 0)
        .build();

    let s = Timestamp::from_seconds;
    assert_intervals_eq(&(&a & &b), &[(s(5.0), s(10.0), 0), (s(20.0), s(25.0), 0)]);
}

#[test]
fn not_is_bounded_by_sentinels() {
    let set = IntervalSetBuilder::new()
        .interval(10.0, 20.0, 0)
        .interval(15.0, 30.0, 0)
        .build();
    let s = Timestamp::from_seconds;

    let inverse = !&set;
    assert_intervals_eq(
        &inverse,
        &[(Timestamp::MIN, s(10.0), 0), (s(30.0), Timestamp::MAX, 0)],
    );
    assert_intervals_eq(&!inverse, &[(s(10.0), s(30.0), 0)]);

    let everything = !SplitIntervalSet::new();
    assert_intervals_eq(&everything, &[(Timestamp::MIN, Timestamp::MAX, 0)]);
}

#[test]
fn plus_applies_a_filter_to_a_splitter() -> Result<()> {
    let splitter: SplitIntervalSet = vec![
        SplitInterval::new(at("16:17:00"), at("16:18:00"), 0),
        SplitInterval::new(at("16:18:00"), at("16:19:00"), 1),
    ]
    .into();
    let filter: SplitIntervalSet = vec![SplitInterval::new(at("16:16:50"), at("16:17:10"), 0)].into();
    assert!(splitter.is_splitter());
    assert!(filter.is_filter());

    let expected = [(at("16:17:00"), at("16:17:10"), 0)];
    assert_intervals_eq(&(&splitter + &filter)?, &expected);
    // the filter side never decides the destination
    assert_intervals_eq(&(&filter + &splitter)?, &expected);
    Ok(())
}

#[test]
fn plus_keeps_splitter_destinations() -> Result<()> {
    let splitter = IntervalSetBuilder::new()
        .interval(0.0, 10.0, 3)
        .interval(10.0, 20.0, 5)
        .build();
    let filter = IntervalSetBuilder::new().interval(8.0, 12.0, -1).build();

    let s = Timestamp::from_seconds;
    assert_intervals_eq(
        &(&filter + &splitter)?,
        &[(s(8.0), s(10.0), 3), (s(10.0), s(12.0), 5)],
    );
    Ok(())
}

#[test]
fn plus_of_two_splitters_is_ambiguous() {
    let a = IntervalSetBuilder::new().interval(0.0, 10.0, 1).build();
    let b = IntervalSetBuilder::new().interval(5.0, 15.0, 2).build();
    assert_eq!((&a + &b).unwrap_err(), LogError::AmbiguousCombination);
}

#[test]
fn rois_grouped_by_destination() -> Result<()> {
    let splitter = IntervalSetBuilder::new()
        .interval(0.0, 10.0, 0)
        .interval(10.0, 20.0, 1)
        .interval(20.0, 30.0, 0)
        .interval(30.0, 40.0, -1)
        .interval(50.0, 50.0, 2)
        .build();

    let rois = time_rois_from_splitters(&splitter);
    assert_eq!(rois.keys().copied().collect::<Vec<_>>(), vec![-1, 0, 1]);

    let zero = &rois[&0];
    assert_eq!(zero.number_of_regions(), 2);
    assert_eq!(zero.duration_in_seconds(), 20.0);
    assert!(zero.value_at_time(Timestamp::from_seconds(25.0)));
    assert!(!zero.value_at_time(Timestamp::from_seconds(15.0)));
    assert_eq!(rois[&1].region(0)?, TimeInterval::new(
        Timestamp::from_seconds(10.0),
        Timestamp::from_seconds(20.0),
    ));
    Ok(())
}

#[test]
fn remove_overlap_and_lookup() -> Result<()> {
    let mut set = IntervalSetBuilder::new()
        .interval(20.0, 30.0, 4)
        .interval(0.0, 5.0, 2)
        .interval(3.0, 8.0, 1)
        .interval(9.0, 9.0, 1)
        .build();
    assert_eq!(set.len(), 4);
    assert!(matches!(set.get(4), Err(LogError::IndexOutOfRange { index: 4, len: 4 })));

    let s = Timestamp::from_seconds;
    assert_intervals_eq(&set.remove_overlap(), &[(s(0.0), s(8.0), 0), (s(20.0), s(30.0), 0)]);

    set.sort_by_start();
    assert_eq!(set.get(0)?.destination(), 2);
    assert_eq!(set.to_string().lines().count(), 4);
    Ok(())
}
