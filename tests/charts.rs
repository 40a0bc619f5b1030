use std::path::PathBuf;

use soccer_dash::charts::{
    ChartKind, ChartOptions, KeeperCategory, SeasonOrder, build_chart, keeper_chart,
};
use soccer_dash::dataset::Dataset;
use soccer_dash::error::StatsError;
use soccer_dash::figure::{Figure, Trace, XyTrace};
use soccer_dash::tenure::{ColorMode, PALETTE};

fn load_fixture() -> Dataset {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("out");
    Dataset::load(&path).expect("fixture dataset should load")
}

fn bars(fig: &Figure) -> Vec<&XyTrace> {
    fig.data
        .iter()
        .filter_map(|t| match t {
            Trace::Bar(b) => Some(b),
            _ => None,
        })
        .collect()
}

fn lines(fig: &Figure) -> Vec<&XyTrace> {
    fig.data
        .iter()
        .filter_map(|t| match t {
            Trace::Scatter(s) => Some(s),
            _ => None,
        })
        .collect()
}

fn approx(a: Option<f64>, b: f64) -> bool {
    a.is_some_and(|a| (a - b).abs() < 1e-6)
}

#[test]
fn goals_chart_splits_tenures_chronologically() {
    let data = load_fixture();
    let fig = build_chart(&data, ChartKind::Goals, 3, ChartOptions::default()).unwrap();

    let bar_traces = bars(&fig);
    let clubs: Vec<&str> = bar_traces.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(clubs, vec!["Benfica", "Porto", "Benfica"]);
    assert_eq!(bar_traces[0].x, vec!["2018-2019", "2019-2020"]);
    assert_eq!(bar_traces[0].y, vec![Some(5.0), Some(8.0)]);
    assert_eq!(bar_traces[1].y, vec![Some(12.0)]);
    assert_eq!(bar_traces[2].x, vec!["2021-2022"]);

    let line_traces = lines(&fig);
    assert_eq!(line_traces.len(), 3);
    assert!(approx(line_traces[0].y[0], 17.0));
    assert!(line_traces.iter().all(|l| l.yaxis == "y2"));
}

#[test]
fn returning_club_keeps_its_color_and_single_legend_entry() {
    let data = load_fixture();
    let fig = build_chart(&data, ChartKind::Goals, 3, ChartOptions::default()).unwrap();
    let bar_traces = bars(&fig);
    assert_eq!(bar_traces[0].marker.color, PALETTE[0]);
    assert_eq!(bar_traces[1].marker.color, PALETTE[1]);
    assert_eq!(bar_traces[2].marker.color, PALETTE[0]);

    let shown: Vec<&str> = fig
        .data
        .iter()
        .filter(|t| t.showlegend())
        .map(|t| t.name())
        .collect();
    assert_eq!(shown, vec!["Benfica", "Porto"]);
}

#[test]
fn per_segment_mode_gives_each_tenure_a_color() {
    let data = load_fixture();
    let opts = ChartOptions {
        color_mode: ColorMode::PerSegment,
        ..ChartOptions::default()
    };
    let fig = build_chart(&data, ChartKind::Goals, 3, opts).unwrap();
    let colors: Vec<&str> = bars(&fig).iter().map(|b| b.marker.color.as_str()).collect();
    assert_eq!(colors, vec![PALETTE[0], PALETTE[1], PALETTE[2]]);
}

#[test]
fn stored_order_follows_table_rows() {
    let data = load_fixture();
    let opts = ChartOptions {
        season_order: SeasonOrder::Stored,
        ..ChartOptions::default()
    };
    let fig = build_chart(&data, ChartKind::Goals, 3, opts).unwrap();
    let clubs: Vec<&str> = bars(&fig).iter().map(|b| b.name.as_str()).collect();
    assert_eq!(clubs, vec!["Porto", "Benfica"]);
}

#[test]
fn cards_sum_yellow_and_red_with_gaps() {
    let data = load_fixture();
    let fig = build_chart(&data, ChartKind::Cards, 3, ChartOptions::default()).unwrap();
    let benfica = bars(&fig)[0];
    assert_eq!(benfica.y, vec![Some(2.0), None]);
    assert_eq!(lines(&fig)[0].y, vec![Some(18.0), None]);
    let last = bars(&fig)[2];
    assert_eq!(last.y, vec![Some(5.0)]);
}

#[test]
fn unparseable_season_fails_chronological_chart() {
    let data = load_fixture();
    let err = build_chart(&data, ChartKind::Goals, 4, ChartOptions::default()).unwrap_err();
    assert!(matches!(err, StatsError::SeasonOrder(ref s) if s == "??"));

    let stored = ChartOptions {
        season_order: SeasonOrder::Stored,
        ..ChartOptions::default()
    };
    assert!(build_chart(&data, ChartKind::Goals, 4, stored).is_ok());
}

#[test]
fn player_without_rows_gets_titled_empty_figure() {
    let data = load_fixture();
    let fig = build_chart(&data, ChartKind::Tackles, 5, ChartOptions::default()).unwrap();
    assert!(fig.is_empty());
    assert_eq!(fig.title(), "Tackles");
    assert!(fig.layout.yaxis2.is_some());
}

#[test]
fn keeper_saves_chart_uses_keeper_table() {
    let data = load_fixture();
    let fig = keeper_chart(&data, 1, "saves", ChartOptions::default()).unwrap();
    assert_eq!(fig.title(), "Saves");
    let bar_traces = bars(&fig);
    assert_eq!(bar_traces.len(), 2);
    assert_eq!(bar_traces[0].y, vec![Some(100.0), Some(95.0)]);
    assert_eq!(bar_traces[1].name, "Feyenoord");
    assert!(approx(lines(&fig)[0].y[1], 72.6));
}

#[test]
fn keeper_penalties_keep_null_as_gap() {
    let data = load_fixture();
    let fig = build_chart(
        &data,
        ChartKind::Keeper(KeeperCategory::Penalties),
        1,
        ChartOptions::default(),
    )
    .unwrap();
    assert_eq!(lines(&fig)[1].y, vec![None]);
    assert_eq!(bars(&fig)[1].y, vec![Some(5.0)]);
}

#[test]
fn unknown_keeper_category_is_rejected() {
    let data = load_fixture();
    let err = keeper_chart(&data, 1, "headers", ChartOptions::default()).unwrap_err();
    assert!(matches!(err, StatsError::UnknownCategory { .. }));
}

#[test]
fn club_history_sums_games_in_first_seen_order() {
    let data = load_fixture();
    let fig = build_chart(&data, ChartKind::ClubHistory, 3, ChartOptions::default()).unwrap();
    let Some(Trace::Pie(pie)) = fig.data.first() else {
        panic!("expected a pie trace");
    };
    assert_eq!(pie.labels, vec!["Benfica", "Porto"]);
    assert_eq!(pie.values, vec![81.0, 30.0]);
    assert_eq!(pie.marker.colors, vec![PALETTE[0], PALETTE[1]]);
}

#[test]
fn club_history_without_games_is_empty() {
    let data = load_fixture();
    let fig = build_chart(&data, ChartKind::ClubHistory, 5, ChartOptions::default()).unwrap();
    assert!(fig.is_empty());
    assert_eq!(fig.title(), "Club history");
}

#[test]
fn figures_serialize_for_plotly() {
    let data = load_fixture();
    let fig = build_chart(&data, ChartKind::Assists, 2, ChartOptions::default()).unwrap();
    let json = fig.to_json().unwrap();
    assert_eq!(json["data"][0]["type"], "bar");
    assert_eq!(json["data"][1]["type"], "scatter");
    assert_eq!(json["layout"]["yaxis2"]["overlaying"], "y");
    assert_eq!(json["layout"]["title"]["text"], "Assists");
}
