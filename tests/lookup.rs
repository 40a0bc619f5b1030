use std::path::PathBuf;

use soccer_dash::dataset::Dataset;
use soccer_dash::error::StatsError;
use soccer_dash::lookup::{get_id_from_name, get_name_from_id, player_by_name, player_info};

fn load_fixture() -> Dataset {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("out");
    Dataset::load(&path).expect("fixture dataset should load")
}

#[test]
fn name_and_id_round_trip_for_every_player() {
    let data = load_fixture();
    for player in data.players() {
        let id = get_id_from_name(data.players(), &player.name).expect("known name");
        assert_eq!(id, player.id);
        let name = get_name_from_id(data.players(), id).expect("known id");
        assert_eq!(name, player.name);
    }
}

#[test]
fn unknown_name_is_not_a_player() {
    let data = load_fixture();
    let err = get_id_from_name(data.players(), "Nobody Atall").unwrap_err();
    assert!(matches!(err, StatsError::NotAPlayer(ref n) if n == "Nobody Atall"));
    assert_eq!(err.to_string(), "Nobody Atall is not a valid player");
}

#[test]
fn name_match_is_exact() {
    let data = load_fixture();
    assert!(get_id_from_name(data.players(), "marco vetti").is_err());
    assert!(get_id_from_name(data.players(), " Marco Vetti").is_err());
    assert_eq!(get_id_from_name(data.players(), "Marco Vetti").unwrap(), 1);
}

#[test]
fn unknown_id_is_reported() {
    let data = load_fixture();
    let err = player_info(data.players(), 99).unwrap_err();
    assert!(matches!(err, StatsError::UnknownPlayerId(99)));
}

#[test]
fn player_by_name_returns_full_record() {
    let data = load_fixture();
    let info = player_by_name(data.players(), "Kenji Sato").expect("known name");
    assert_eq!(info.id, 4);
    assert_eq!(info.club, "Lyon");
    assert_eq!(info.position, "MF");
}
