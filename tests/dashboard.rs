use std::path::PathBuf;

use soccer_dash::charts::ChartOptions;
use soccer_dash::dashboard::Dashboard;
use soccer_dash::dataset::Dataset;
use soccer_dash::error::StatsError;
use soccer_dash::positions::Page;
use soccer_dash::state::{AppState, Focus};

fn load_fixture() -> Dataset {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("out");
    Dataset::load(&path).expect("fixture dataset should load")
}

#[test]
fn position_options_are_sorted_and_scoped_to_page() {
    let data = load_fixture();
    let dash = Dashboard::new(&data, ChartOptions::default());
    assert_eq!(
        dash.positions(Page::Home),
        vec!["DF (CB)", "DF (LB)", "FW-MF (AM)", "GK", "MF"]
    );
    assert_eq!(dash.positions(Page::Defenders), vec!["DF (CB)", "DF (LB)"]);
    assert_eq!(dash.positions(Page::Goalkeepers), vec!["GK"]);
    assert_eq!(dash.positions(Page::Forwards), vec!["FW-MF (AM)"]);
}

#[test]
fn player_options_filter_by_position() {
    let data = load_fixture();
    let dash = Dashboard::new(&data, ChartOptions::default());

    let all = dash.players(Page::Home, None);
    assert_eq!(all.names.len(), 5);
    assert_eq!(all.default.as_deref(), Some("Kenji Sato"));

    let centre_backs = dash.players(Page::Defenders, Some("DF (CB)"));
    assert_eq!(centre_backs.names, vec!["Tomas Berg"]);
    assert_eq!(centre_backs.default.as_deref(), Some("Tomas Berg"));

    let none = dash.players(Page::Goalkeepers, Some("DF (CB)"));
    assert!(none.names.is_empty());
    assert_eq!(none.default, None);
}

#[test]
fn field_view_has_field_charts_and_profile() {
    let data = load_fixture();
    let dash = Dashboard::new(&data, ChartOptions::default());
    let view = dash.player_view(Page::Forwards, "Luis Andrade").unwrap();

    let ids: Vec<&str> = view.charts.iter().map(|c| c.id).collect();
    assert_eq!(
        ids,
        vec!["goals", "cards", "tackles", "assists", "games", "club_history"]
    );
    assert_eq!(view.profile.club, "Benfica");
    assert_eq!(view.profile.country_of_birth, "BRA");
    assert!(view.charts.iter().all(|c| !c.figure.is_empty()));
}

#[test]
fn keeper_view_swaps_in_keeper_charts() {
    let data = load_fixture();
    let dash = Dashboard::new(&data, ChartOptions::default());
    let view = dash.player_view(Page::Goalkeepers, "Marco Vetti").unwrap();
    assert!(view.chart("keeper_clean_sheets").is_some());
    assert!(view.chart("keeper_penalties").is_some());
    assert!(view.chart("goals").is_none());

    let saves = view.chart("keeper_saves").unwrap();
    assert_eq!(saves.title, "Saves");
    assert!(!saves.figure.is_empty());
}

#[test]
fn failing_chart_is_masked_as_empty() {
    let data = load_fixture();
    let dash = Dashboard::new(&data, ChartOptions::default());
    let view = dash.player_view(Page::Midfielders, "Kenji Sato").unwrap();

    let goals = view.chart("goals").unwrap();
    assert!(goals.figure.is_empty());
    assert_eq!(goals.figure.title(), "Goals");
    assert!(!view.chart("cards").unwrap().figure.is_empty());
}

#[test]
fn player_without_seasons_gets_empty_charts() {
    let data = load_fixture();
    let dash = Dashboard::new(&data, ChartOptions::default());
    let view = dash.player_view(Page::Defenders, "Nils Dahl").unwrap();
    assert!(view.charts.iter().all(|c| c.figure.is_empty()));
    let lines = view.profile.lines();
    assert!(lines.contains(&("Height", "-".to_string())));
    assert!(lines.contains(&("Club", "-".to_string())));
}

#[test]
fn unknown_player_is_an_error() {
    let data = load_fixture();
    let dash = Dashboard::new(&data, ChartOptions::default());
    let err = dash.player_view(Page::Home, "Nobody").unwrap_err();
    assert!(matches!(err, StatsError::NotAPlayer(_)));
}

#[test]
fn keeper_figure_by_category_label() {
    let data = load_fixture();
    let dash = Dashboard::new(&data, ChartOptions::default());
    let fig = dash.keeper_figure("Marco Vetti", "clean sheets").unwrap();
    assert_eq!(fig.title(), "Clean sheets");
    assert!(dash.keeper_figure("Marco Vetti", "corners").is_err());
    // field players have no keeper rows
    assert!(dash.keeper_figure("Tomas Berg", "saves").unwrap().is_empty());
}

#[test]
fn state_cascade_follows_page_and_position() {
    let data = load_fixture();
    let dash = Dashboard::new(&data, ChartOptions::default());
    let mut state = AppState::new();

    state.set_page(Page::Defenders, &dash);
    assert_eq!(state.selected_position(), Some("DF (CB)"));
    assert_eq!(state.selected_player(), Some("Tomas Berg"));
    assert_eq!(
        state.view.as_ref().map(|v| v.profile.name.as_str()),
        Some("Tomas Berg")
    );

    state.focus = Focus::Positions;
    state.select_next(&dash);
    assert_eq!(state.selected_position(), Some("DF (LB)"));
    assert_eq!(state.selected_player(), Some("Nils Dahl"));

    state.select_next(&dash);
    assert_eq!(state.selected_position(), Some("DF (CB)"));
}

#[test]
fn state_selection_wraps_backwards() {
    let data = load_fixture();
    let dash = Dashboard::new(&data, ChartOptions::default());
    let mut state = AppState::new();
    state.set_page(Page::Home, &dash);
    assert_eq!(state.focus, Focus::Players);
    assert_eq!(state.selected_player(), Some("Tomas Berg"));

    // one player for this position, so moving stays put
    state.select_prev(&dash);
    assert_eq!(state.selected_player(), Some("Tomas Berg"));

    state.toggle_focus();
    state.select_prev(&dash);
    assert_eq!(state.selected_position(), Some("MF"));
    assert_eq!(state.selected_player(), Some("Kenji Sato"));
    assert!(state.view.as_ref().and_then(|v| v.chart("goals")).is_some());
    assert!(state.logs.iter().any(|l| l.contains("without data")));
}
