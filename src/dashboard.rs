use serde::Serialize;

use crate::charts::{ChartKind, ChartOptions, KeeperCategory, build_chart};
use crate::dataset::{Dataset, PlayerInfo};
use crate::error::StatsResult;
use crate::figure::Figure;
use crate::lookup::player_by_name;
use crate::positions::{Page, PlayerOptions, players_for, positions_for};

const FIELD_CHARTS: [ChartKind; 6] = [
    ChartKind::Goals,
    ChartKind::Cards,
    ChartKind::Tackles,
    ChartKind::Assists,
    ChartKind::Games,
    ChartKind::ClubHistory,
];

const KEEPER_CHARTS: [ChartKind; 5] = [
    ChartKind::Keeper(KeeperCategory::CleanSheets),
    ChartKind::Keeper(KeeperCategory::Saves),
    ChartKind::Keeper(KeeperCategory::Penalties),
    ChartKind::Games,
    ChartKind::ClubHistory,
];

pub fn charts_for(page: Page) -> &'static [ChartKind] {
    if page.is_goalkeepers() {
        &KEEPER_CHARTS
    } else {
        &FIELD_CHARTS
    }
}

/// Text fields shown next to the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerProfile {
    pub id: u32,
    pub name: String,
    pub position: String,
    pub general_position: String,
    pub club: String,
    pub nationality: String,
    pub country_of_birth: String,
    pub age: Option<f64>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

impl PlayerProfile {
    pub fn from_info(info: &PlayerInfo) -> Self {
        Self {
            id: info.id,
            name: info.name.clone(),
            position: info.position.clone(),
            general_position: info.general_position.clone(),
            club: info.club.clone(),
            nationality: info.nt.clone(),
            country_of_birth: info.countryob.clone(),
            age: info.age,
            height: info.height,
            weight: info.weight,
        }
    }

    pub fn lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Name", self.name.clone()),
            ("Position", or_dash(&self.position)),
            ("Club", or_dash(&self.club)),
            ("Nationality", or_dash(&self.nationality)),
            ("Age", number_or_dash(self.age, "")),
            ("Height", number_or_dash(self.height, " cm")),
            ("Weight", number_or_dash(self.weight, " kg")),
        ]
    }
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn number_or_dash(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{v:.0}{unit}"),
        Some(v) => format!("{v:.1}{unit}"),
        None => "-".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedChart {
    pub id: &'static str,
    pub title: String,
    pub figure: Figure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub page: Page,
    pub profile: PlayerProfile,
    pub charts: Vec<NamedChart>,
}

impl PlayerView {
    pub fn chart(&self, id: &str) -> Option<&NamedChart> {
        self.charts.iter().find(|c| c.id == id)
    }
}

/// Read-only view over a loaded dataset; every call recomputes from the tables.
#[derive(Debug, Clone, Copy)]
pub struct Dashboard<'a> {
    data: &'a Dataset,
    opts: ChartOptions,
}

impl<'a> Dashboard<'a> {
    pub fn new(data: &'a Dataset, opts: ChartOptions) -> Self {
        Self { data, opts }
    }

    pub fn data(&self) -> &'a Dataset {
        self.data
    }

    pub fn positions(&self, page: Page) -> Vec<String> {
        positions_for(self.data.players(), page)
    }

    pub fn players(&self, page: Page, position: Option<&str>) -> PlayerOptions {
        players_for(self.data.players(), page, position)
    }

    pub fn player_view(&self, page: Page, player_name: &str) -> StatsResult<PlayerView> {
        let info = player_by_name(self.data.players(), player_name)?;
        let charts = charts_for(page)
            .iter()
            .map(|&kind| NamedChart {
                id: kind.id(),
                title: kind.title().to_string(),
                figure: self.chart_or_empty(kind, info.id),
            })
            .collect();
        Ok(PlayerView {
            page,
            profile: PlayerProfile::from_info(info),
            charts,
        })
    }

    pub fn keeper_figure(&self, player_name: &str, category: &str) -> StatsResult<Figure> {
        let category = KeeperCategory::parse(category)?;
        let info = player_by_name(self.data.players(), player_name)?;
        Ok(self.chart_or_empty(ChartKind::Keeper(category), info.id))
    }

    /// Builder failures for one player's data are logged and replaced by an
    /// empty figure so the rest of the view still renders.
    pub fn chart_or_empty(&self, kind: ChartKind, player_id: u32) -> Figure {
        match build_chart(self.data, kind, player_id, self.opts) {
            Ok(fig) => fig,
            Err(err) => {
                log::warn!("{} chart for player {player_id} left empty: {err}", kind.id());
                Figure::empty(kind.title())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_formatting_drops_integral_fraction() {
        assert_eq!(number_or_dash(Some(180.0), " cm"), "180 cm");
        assert_eq!(number_or_dash(Some(72.5), " kg"), "72.5 kg");
        assert_eq!(number_or_dash(None, " kg"), "-");
    }

    #[test]
    fn keeper_page_gets_keeper_charts() {
        assert!(charts_for(Page::Goalkeepers).contains(&ChartKind::Keeper(KeeperCategory::Saves)));
        assert!(!charts_for(Page::Forwards).contains(&ChartKind::Keeper(KeeperCategory::Saves)));
        assert!(charts_for(Page::Home).contains(&ChartKind::Goals));
    }
}
