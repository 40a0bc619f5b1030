use std::collections::BTreeSet;

use serde::Serialize;

use crate::dataset::PlayerInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Home,
    Goalkeepers,
    Defenders,
    Midfielders,
    Forwards,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Home,
        Page::Goalkeepers,
        Page::Defenders,
        Page::Midfielders,
        Page::Forwards,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Goalkeepers => "/goalkeepers",
            Page::Defenders => "/defenders",
            Page::Midfielders => "/midfielders",
            Page::Forwards => "/forwards",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Goalkeepers => "goalkeepers",
            Page::Defenders => "defenders",
            Page::Midfielders => "midfielders",
            Page::Forwards => "forwards",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Goalkeepers => "Goalkeepers",
            Page::Defenders => "Defenders",
            Page::Midfielders => "Midfielders",
            Page::Forwards => "Forwards",
        }
    }

    /// Unknown paths fall back to the home page.
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim().trim_end_matches('/');
        let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
        Self::from_slug(trimmed).unwrap_or(Page::Home)
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        let slug = slug.trim().to_ascii_lowercase();
        if slug.is_empty() {
            return Some(Page::Home);
        }
        Self::ALL.into_iter().find(|p| p.slug() == slug)
    }

    pub fn is_goalkeepers(self) -> bool {
        self == Page::Goalkeepers
    }

    pub fn includes(self, player: &PlayerInfo) -> bool {
        match self {
            Page::Home => true,
            other => position_page(&player.general_position) == Some(other),
        }
    }
}

/// Position page for a general position such as `GK`, `DF-MF` or `Forward`.
/// The first listed role decides.
pub fn position_page(general_position: &str) -> Option<Page> {
    let first = general_position
        .split(['-', ',', '/', ' '])
        .map(str::trim)
        .find(|s| !s.is_empty())?
        .to_ascii_lowercase();
    match first.as_str() {
        "gk" | "goalkeeper" | "keeper" => Some(Page::Goalkeepers),
        "df" | "defender" | "defence" | "defense" => Some(Page::Defenders),
        "mf" | "midfielder" | "midfield" => Some(Page::Midfielders),
        "fw" | "forward" | "attacker" | "striker" => Some(Page::Forwards),
        _ => None,
    }
}

/// Sorted distinct raw positions of the page's players.
pub fn positions_for(players: &[PlayerInfo], page: Page) -> Vec<String> {
    players
        .iter()
        .filter(|p| page.includes(p))
        .map(|p| p.position.clone())
        .filter(|p| !p.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerOptions {
    pub names: Vec<String>,
    pub default: Option<String>,
}

/// Players on `page` with the given raw position (`None` = any), sorted by name.
pub fn players_for(players: &[PlayerInfo], page: Page, position: Option<&str>) -> PlayerOptions {
    let mut names: Vec<String> = players
        .iter()
        .filter(|p| page.includes(p))
        .filter(|p| position.is_none_or(|pos| p.position == pos))
        .map(|p| p.name.clone())
        .collect();
    names.sort();
    names.dedup();
    let default = names.first().cloned();
    PlayerOptions { names, default }
}
