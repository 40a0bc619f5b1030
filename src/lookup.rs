use crate::dataset::PlayerInfo;
use crate::error::{StatsError, StatsResult};
use crate::timing::time_this;

/// First id whose name matches exactly.
pub fn get_id_from_name(players: &[PlayerInfo], player_name: &str) -> StatsResult<u32> {
    time_this("get_id_from_name", || {
        players
            .iter()
            .find(|p| p.name == player_name)
            .map(|p| p.id)
            .ok_or_else(|| StatsError::NotAPlayer(player_name.to_string()))
    })
}

pub fn get_name_from_id(players: &[PlayerInfo], player_id: u32) -> StatsResult<String> {
    player_info(players, player_id).map(|p| p.name.clone())
}

pub fn player_info(players: &[PlayerInfo], player_id: u32) -> StatsResult<&PlayerInfo> {
    players
        .iter()
        .find(|p| p.id == player_id)
        .ok_or(StatsError::UnknownPlayerId(player_id))
}

pub fn player_by_name<'a>(players: &'a [PlayerInfo], player_name: &str) -> StatsResult<&'a PlayerInfo> {
    let id = get_id_from_name(players, player_name)?;
    player_info(players, id)
}
