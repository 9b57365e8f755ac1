//! Filtered views: masks, ROIs and the region quick-reference table.

use anyhow::Result;
use ironlog::testing::*;
use ironlog::*;

fn at(offset: &str) -> Timestamp {
    ts(&format!("2007-11-30T{offset}"))
}

#[test]
fn unfiltered_view_defers_to_the_series() -> Result<()> {
    let view = FilteredTimeSeries::from(sample_double_log());
    assert!(!view.is_filtered());
    assert_eq!(view.size(), 4);
    assert_eq!(view.real_size(), 4);
    assert_eq!(view.name(), "double_log");
    assert_eq!(view.values_as_vector(), view.series().values_as_vector());
    assert_eq!(view.nth_interval(3)?, TimeInterval::new(at("16:17:30"), at("16:17:40")));
    assert_close(view.time_average_value()?, 8.41, 1e-9);

    assert_intervals_eq(
        &view.get_splitting_intervals(),
        &[(at("16:17:00"), at("16:17:30"), 0)],
    );
    Ok(())
}

#[test]
fn mask_keeps_transitions_and_closes_trailing_true() {
    let mut view = FilteredTimeSeries::new(sample_double_log());
    view.filter_with(&sample_mask());

    // the log ends after the mask, so its last step closes the region
    assert_eq!(
        view.filter(),
        &[
            (at("16:17:00"), true),
            (at("16:17:15"), false),
            (at("16:17:25"), true),
            (at("16:17:40"), false),
        ]
    );
}

#[test]
fn repeated_mask_states_collapse() {
    let mut mask = TimeSeries::new("mask");
    mask.add_value(at("16:17:00"), false);
    mask.add_value(at("16:17:05"), false);
    mask.add_value(at("16:17:12"), true);
    mask.add_value(at("16:17:14"), true);
    mask.add_value(at("16:17:22"), false);

    let mut view = FilteredTimeSeries::new(sample_double_log());
    view.filter_with(&mask);
    assert_eq!(
        view.filter(),
        &[
            (at("16:17:00"), false),
            (at("16:17:12"), true),
            (at("16:17:22"), false),
        ]
    );
    // 7.55 is in force at 16:17:12 and 5.55 arrives inside the region
    assert_eq!(view.values_as_vector(), vec![7.55, 5.55]);
}

#[test]
fn region_table_counts_each_entry_once() {
    let mut view = FilteredTimeSeries::new(sample_double_log());
    view.filter_with(&sample_mask());

    let regions = view.regions();
    assert_eq!(regions.len(), 2);
    assert_eq!(
        regions[0],
        Region { filter_start: 0, value_start: 0, value_end: 2, filter_end: 1, count_before: 0 }
    );
    assert_eq!(
        regions[1],
        Region { filter_start: 2, value_start: 2, value_end: 4, filter_end: 3, count_before: 2 }
    );
    assert_eq!(view.size(), regions.iter().map(Region::count).sum::<usize>());
}

#[test]
fn intervals_are_clipped_to_their_region() -> Result<()> {
    let mut view = FilteredTimeSeries::new(sample_double_log());
    view.filter_with(&sample_mask());

    assert_eq!(view.nth_interval(0)?, TimeInterval::new(at("16:17:00"), at("16:17:10")));
    assert_eq!(view.nth_interval(1)?, TimeInterval::new(at("16:17:10"), at("16:17:15")));
    assert_eq!(view.nth_interval(2)?, TimeInterval::new(at("16:17:25"), at("16:17:30")));
    assert_eq!(view.nth_interval(3)?, TimeInterval::new(at("16:17:30"), at("16:17:40")));
    // past the end clamps
    assert_eq!(view.nth_interval(10)?, view.nth_interval(3)?);
    Ok(())
}

#[test]
fn filtered_time_average_uses_included_time_only() -> Result<()> {
    let mut view = FilteredTimeSeries::new(sample_double_log());
    view.filter_with(&sample_mask());

    let expected = (10.0 * 9.99 + 5.0 * 7.55 + 5.0 * 5.55 + 10.0 * 10.55) / 30.0;
    assert_close(view.time_average_value()?, expected, 1e-9);
    assert_intervals_eq(
        &view.get_splitting_intervals(),
        &[
            (at("16:17:00"), at("16:17:15"), 0),
            (at("16:17:25"), at("16:17:40"), 0),
        ],
    );
    Ok(())
}

#[test]
fn roi_filter_selects_values_in_force() -> Result<()> {
    let mut view = FilteredTimeSeries::new(ten_sample_log());
    let mut roi = TimeROI::new(at("16:17:40"), at("16:18:10"));
    roi.add_roi(at("16:19:00"), at("16:19:45"));
    view.filter_with_roi(&roi);

    // [16:17:40, 16:18:10) -> 1 (in force), 2 (at 16:18:00)
    // [16:19:00, 16:19:45) -> 4 (exactly at start), 5 (at 16:19:30)
    assert_eq!(view.values_as_vector(), vec![1, 2, 4, 5]);
    assert_eq!(view.size(), 4);
    assert_eq!(view.real_size(), 10);
    assert_eq!(view.first_value()?, 1);
    assert_eq!(view.last_value()?, 5);
    assert_eq!(view.nth_value(2)?, 4);
    assert_eq!(view.nth_time(1)?, at("16:18:00"));
    assert_eq!(
        view.times_as_vector(),
        vec![at("16:17:30"), at("16:18:00"), at("16:19:00"), at("16:19:30")]
    );
    Ok(())
}

#[test]
fn repeated_start_time_shows_only_the_last_entry() -> Result<()> {
    let log = SeriesBuilder::new("dup")
        .starting_at(at("16:17:00"))
        .points(&[(0.0, 1), (10.0, 2), (10.0, 3), (20.0, 4)])
        .build();
    let roi = TimeROI::new(at("16:17:10"), at("16:17:20"));

    let mut view = FilteredTimeSeries::new(log.clone());
    view.filter_with_roi(&roi);
    assert_eq!(view.values_as_vector(), vec![3]);
    assert_eq!(log.filtered_values_as_vector(&roi), vec![3]);

    // the splitter routes both entries recorded at the start
    let splitter = SplitIntervalSet::from(vec![SplitInterval::new(at("16:17:10"), at("16:17:20"), 0)]);
    let mut outputs = vec![TimeSeries::new("out")];
    log.split_by_time(&splitter, &mut outputs, false)?;
    assert_eq!(outputs[0].values_as_vector(), vec![2, 3]);
    Ok(())
}

#[test]
fn nothing_visible() {
    let mut view = FilteredTimeSeries::new(ten_sample_log());
    view.filter_with_roi(&TimeROI::use_none());
    assert!(view.is_filtered());
    assert_eq!(view.size(), 0);
    assert!(matches!(view.first_value(), Err(LogError::EmptySeries(_))));
    assert!(view.values_as_vector().is_empty());

    view.filter_with_roi(&TimeROI::new(at("17:00:00"), at("18:00:00")));
    assert_eq!(view.size(), 0);

    view.filter_with_roi(&TimeROI::use_all());
    assert!(!view.is_filtered());
    assert_eq!(view.size(), 10);
}

#[test]
fn empty_mask_clears_the_filter() {
    let mut view = FilteredTimeSeries::new(sample_double_log());
    view.filter_with(&sample_mask());
    assert!(view.is_filtered());

    view.filter_with(&TimeSeries::new("empty"));
    assert!(!view.is_filtered());
    assert_eq!(view.size(), 4);
}

#[test]
fn appending_rebuilds_the_table() {
    let mut view = FilteredTimeSeries::new(sample_double_log());
    view.filter_with_roi(&TimeROI::new(at("16:17:00"), at("16:18:00")));
    assert_eq!(view.size(), 4);

    view.add_value(at("16:17:45"), 1.0);
    view.add_value(at("16:19:00"), 2.0);
    assert_eq!(view.size(), 5);
    assert_eq!(view.real_size(), 6);
    assert_eq!(view.last_value().ok(), Some(1.0));

    let log = view.into_inner();
    assert_eq!(log.size(), 6);
}
