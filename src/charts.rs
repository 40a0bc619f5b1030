use std::collections::HashMap;

use serde::Serialize;

use crate::dataset::{Category, Dataset, Table, parse_f64};
use crate::error::{StatsError, StatsResult};
use crate::figure::{Axis, Figure, Layout, PieMarker, PieTrace, Title, Trace};
use crate::tenure::{ClubColors, ColorMode, segment_by_club};
use crate::timing::time_this;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonOrder {
    /// Rows in the order the table stores them.
    Stored,
    /// Stable sort by the season's start year.
    Chronological,
}

impl SeasonOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "stored" | "as_stored" | "none" => Some(SeasonOrder::Stored),
            "chronological" | "season" | "sorted" => Some(SeasonOrder::Chronological),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub color_mode: ColorMode,
    pub season_order: SeasonOrder,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::ByClub,
            season_order: SeasonOrder::Chronological,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeeperCategory {
    CleanSheets,
    Saves,
    Penalties,
}

impl KeeperCategory {
    pub const ALL: [KeeperCategory; 3] = [
        KeeperCategory::CleanSheets,
        KeeperCategory::Saves,
        KeeperCategory::Penalties,
    ];

    pub fn parse(raw: &str) -> StatsResult<Self> {
        match raw.trim().to_ascii_lowercase().replace(['_', '-'], " ").as_str() {
            "clean sheets" => Ok(KeeperCategory::CleanSheets),
            "saves" => Ok(KeeperCategory::Saves),
            "penalties" => Ok(KeeperCategory::Penalties),
            _ => Err(StatsError::UnknownCategory {
                kind: "keeper category",
                value: raw.to_string(),
            }),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            KeeperCategory::CleanSheets => "clean sheets",
            KeeperCategory::Saves => "saves",
            KeeperCategory::Penalties => "penalties",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Goals,
    Cards,
    Tackles,
    Assists,
    Games,
    Keeper(KeeperCategory),
    ClubHistory,
}

impl ChartKind {
    pub fn id(self) -> &'static str {
        match self {
            ChartKind::Goals => "goals",
            ChartKind::Cards => "cards",
            ChartKind::Tackles => "tackles",
            ChartKind::Assists => "assists",
            ChartKind::Games => "games",
            ChartKind::Keeper(KeeperCategory::CleanSheets) => "keeper_clean_sheets",
            ChartKind::Keeper(KeeperCategory::Saves) => "keeper_saves",
            ChartKind::Keeper(KeeperCategory::Penalties) => "keeper_penalties",
            ChartKind::ClubHistory => "club_history",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::ClubHistory => "Club history",
            other => dual_metric(other).map(|s| s.title).unwrap_or(""),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Measure {
    Column(&'static str),
    /// Sum of the present values, absent when every input is absent.
    Sum(&'static [&'static str]),
    /// Ratio column scaled to a percentage.
    Percent(&'static str),
}

impl Measure {
    fn columns(&self) -> Vec<&'static str> {
        match self {
            Measure::Column(c) | Measure::Percent(c) => vec![*c],
            Measure::Sum(cols) => cols.to_vec(),
        }
    }

    fn evaluate(&self, values: &[Option<f64>]) -> Option<f64> {
        match self {
            Measure::Column(_) => values.first().copied().flatten(),
            Measure::Percent(_) => values.first().copied().flatten().map(|v| v * 100.0),
            Measure::Sum(_) => {
                let present: Vec<f64> = values.iter().filter_map(|v| *v).collect();
                if present.is_empty() {
                    None
                } else {
                    Some(present.iter().sum())
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct DualMetric {
    title: &'static str,
    category: Category,
    bar: Measure,
    bar_axis: &'static str,
    line: Measure,
    line_axis: &'static str,
}

fn dual_metric(kind: ChartKind) -> Option<DualMetric> {
    let metric = match kind {
        ChartKind::Goals => DualMetric {
            title: "Goals",
            category: Category::Shooting,
            bar: Measure::Column("goals"),
            bar_axis: "Goals",
            line: Measure::Percent("goals_per_shot"),
            line_axis: "Scoring percentage",
        },
        ChartKind::Cards => DualMetric {
            title: "Cards",
            category: Category::Misc,
            bar: Measure::Sum(&["cards_yellow", "cards_red"]),
            bar_axis: "Cards",
            line: Measure::Column("fouls"),
            line_axis: "Fouls",
        },
        ChartKind::Tackles => DualMetric {
            title: "Tackles",
            category: Category::Defense,
            bar: Measure::Column("tackles"),
            bar_axis: "Tackles",
            line: Measure::Column("dribbled_past"),
            line_axis: "Dribbled past",
        },
        ChartKind::Assists => DualMetric {
            title: "Assists",
            category: Category::Passing,
            bar: Measure::Column("assists"),
            bar_axis: "Assists",
            line: Measure::Column("passes_pct"),
            line_axis: "Pass completion %",
        },
        ChartKind::Games => DualMetric {
            title: "Games played",
            category: Category::PlayingTime,
            bar: Measure::Column("games"),
            bar_axis: "Games",
            line: Measure::Column("minutes_per_game"),
            line_axis: "Minutes per game",
        },
        ChartKind::Keeper(KeeperCategory::CleanSheets) => DualMetric {
            title: "Clean sheets",
            category: Category::Keeper,
            bar: Measure::Column("clean_sheets"),
            bar_axis: "Clean sheets",
            line: Measure::Column("clean_sheets_pct"),
            line_axis: "Clean sheets percentage",
        },
        ChartKind::Keeper(KeeperCategory::Saves) => DualMetric {
            title: "Saves",
            category: Category::Keeper,
            bar: Measure::Column("shots_on_target_against"),
            bar_axis: "Shots on target",
            line: Measure::Column("save_pct"),
            line_axis: "Save percentage",
        },
        ChartKind::Keeper(KeeperCategory::Penalties) => DualMetric {
            title: "Penalties",
            category: Category::Keeper,
            bar: Measure::Column("pens_att_gk"),
            bar_axis: "Penalties against",
            line: Measure::Column("pens_save_pct"),
            line_axis: "Penalty save percentage",
        },
        ChartKind::ClubHistory => return None,
    };
    Some(metric)
}

/// One season of one player in one category table.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonRow {
    pub season: String,
    pub squad: String,
    pub values: Vec<Option<f64>>,
}

/// The player's rows with `columns` read as numbers, in stored order.
pub fn player_seasons(table: &Table, player_id: u32, columns: &[&str]) -> StatsResult<Vec<SeasonRow>> {
    let season = table.column_index("season")?;
    let squad = table.column_index("squad")?;
    let value_cols = columns
        .iter()
        .map(|c| table.column_index(c))
        .collect::<StatsResult<Vec<_>>>()?;

    let player = table.filter_by_id(player_id)?;
    Ok((0..player.len())
        .map(|row| SeasonRow {
            season: player.cell(row, season).trim().to_string(),
            squad: player.cell(row, squad).trim().to_string(),
            values: value_cols
                .iter()
                .map(|&col| parse_f64(player.cell(row, col)))
                .collect(),
        })
        .collect())
}

/// `"2019-2020"`, `"2019/20"` and `"2019"` all start in 2019.
pub fn season_start_year(label: &str) -> Option<i32> {
    let head = label
        .trim()
        .split(['-', '/', ' '])
        .next()
        .unwrap_or("");
    if head.len() != 4 {
        return None;
    }
    head.parse::<i32>().ok()
}

pub fn order_seasons(rows: &mut [SeasonRow], order: SeasonOrder) -> StatsResult<()> {
    if order == SeasonOrder::Stored {
        return Ok(());
    }
    let mut keyed = Vec::with_capacity(rows.len());
    for row in rows.iter() {
        let year = season_start_year(&row.season)
            .ok_or_else(|| StatsError::SeasonOrder(row.season.clone()))?;
        keyed.push(year);
    }
    let mut order_idx: Vec<usize> = (0..rows.len()).collect();
    order_idx.sort_by_key(|&i| keyed[i]);
    let sorted: Vec<SeasonRow> = order_idx.iter().map(|&i| rows[i].clone()).collect();
    rows.clone_from_slice(&sorted);
    Ok(())
}

pub fn build_chart(
    data: &Dataset,
    kind: ChartKind,
    player_id: u32,
    opts: ChartOptions,
) -> StatsResult<Figure> {
    time_this(kind.id(), || -> StatsResult<Figure> {
        match dual_metric(kind) {
            Some(metric) => dual_chart(data.table(metric.category)?, &metric, player_id, opts),
            None => club_history_chart(data.table(Category::PlayingTime)?, player_id, opts),
        }
    })
}

pub fn keeper_chart(
    data: &Dataset,
    player_id: u32,
    category: &str,
    opts: ChartOptions,
) -> StatsResult<Figure> {
    let category = KeeperCategory::parse(category)?;
    build_chart(data, ChartKind::Keeper(category), player_id, opts)
}

fn dual_chart(
    table: &Table,
    metric: &DualMetric,
    player_id: u32,
    opts: ChartOptions,
) -> StatsResult<Figure> {
    let bar_cols = metric.bar.columns();
    let line_cols = metric.line.columns();
    let columns: Vec<&str> = bar_cols.iter().chain(line_cols.iter()).copied().collect();

    let mut rows = player_seasons(table, player_id, &columns)?;
    order_seasons(&mut rows, opts.season_order)?;

    let split = bar_cols.len();
    let mut colors = ClubColors::new(opts.color_mode);
    let mut fig = dual_axis_figure(metric.title, metric.bar_axis, metric.line_axis);

    for segment in segment_by_club(&rows, |r| r.squad.as_str()) {
        let color = colors.color_for(&segment);
        let tenure = &rows[segment.range()];
        let x: Vec<String> = tenure.iter().map(|r| r.season.clone()).collect();
        let bars = tenure
            .iter()
            .map(|r| metric.bar.evaluate(&r.values[..split]))
            .collect();
        let line = tenure
            .iter()
            .map(|r| metric.line.evaluate(&r.values[split..]))
            .collect();
        fig.data.push(Trace::bar(&segment.club, x.clone(), bars, color));
        fig.data.push(Trace::line(&segment.club, x, line, color));
    }

    fig.dedupe_legend();
    Ok(fig)
}

fn dual_axis_figure(title: &str, bar_axis: &str, line_axis: &str) -> Figure {
    Figure {
        data: Vec::new(),
        layout: Layout {
            title: Title {
                text: title.to_string(),
            },
            xaxis: Some(Axis::titled("season")),
            yaxis: Some(Axis::titled(bar_axis)),
            yaxis2: Some(Axis::secondary(line_axis)),
            showlegend: true,
            barmode: Some("group".to_string()),
        },
    }
}

/// Share of games played per club, clubs in order of first appearance.
fn club_history_chart(table: &Table, player_id: u32, opts: ChartOptions) -> StatsResult<Figure> {
    let mut rows = player_seasons(table, player_id, &["games"])?;
    order_seasons(&mut rows, opts.season_order)?;

    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, f64> = HashMap::new();
    for row in &rows {
        let games = row.values.first().copied().flatten().unwrap_or(0.0);
        if !totals.contains_key(&row.squad) {
            order.push(row.squad.clone());
        }
        *totals.entry(row.squad.clone()).or_insert(0.0) += games;
    }

    let mut fig = Figure::empty(ChartKind::ClubHistory.title());
    fig.layout.showlegend = true;

    let clubs: Vec<String> = order
        .into_iter()
        .filter(|club| totals.get(club).copied().unwrap_or(0.0) > 0.0)
        .collect();
    if clubs.is_empty() {
        return Ok(fig);
    }

    let mut colors = ClubColors::new(ColorMode::ByClub);
    let palette = clubs
        .iter()
        .map(|club| colors.club_color(club).to_string())
        .collect();
    let values = clubs
        .iter()
        .map(|club| totals.get(club).copied().unwrap_or(0.0))
        .collect();
    fig.data.push(Trace::Pie(PieTrace {
        name: "Games per club".to_string(),
        labels: clubs,
        values,
        marker: PieMarker { colors: palette },
        showlegend: true,
    }));
    Ok(fig)
}
