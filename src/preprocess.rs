use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::dataset::{Category, Table, load_tables};
use crate::error::{StatsError, StatsResult};

/// Columns shared by every per-season table.
pub const SAME_COLUMNS: [&str; 6] = ["id", "season", "country", "comp_level", "squad", "age"];

const INFO_COLUMNS: &[&str] = &[
    "id", "name", "position", "height", "weight", "nt", "countryob", "club", "age",
];
const MISC_COLUMNS: &[&str] = &[
    "cards_yellow",
    "cards_red",
    "fouls",
    "offsides",
    "interceptions",
    "tackles_won",
    "ball_recoveries",
];
const GCA_COLUMNS: &[&str] = &["gca", "gca_per90"];
const DEFENSE_COLUMNS: &[&str] = &[
    "tackles",
    "pressures",
    "dribbled_past",
    "blocks",
    "blocked_shots",
];
const KEEPER_COLUMNS: &[&str] = &[
    "goals_against_gk",
    "goals_against_per90_gk",
    "shots_on_target_against",
    "save_pct",
    "clean_sheets",
    "clean_sheets_pct",
    "pens_att_gk",
    "pens_save_pct",
];
const KEEPER_ADV_COLUMNS: &[&str] = &["passes_gk", "pct_passes_launched_gk"];
const PASSING_COLUMNS: &[&str] = &[
    "passes",
    "passes_pct",
    "passes_short",
    "passes_pct_short",
    "passes_medium",
    "passes_pct_medium",
    "passes_long",
    "passes_pct_long",
    "assists",
];
const PLAYING_TIME_COLUMNS: &[&str] = &["games", "minutes", "minutes_per_game", "points_per_match"];
const SHOOTING_COLUMNS: &[&str] = &[
    "goals",
    "shots_total",
    "shots_on_target",
    "shots_on_target_pct",
    "goals_per_shot",
    "goals_per_shot_on_target",
];

/// Columns kept for a category. The info table's derived `general_position` is not listed here.
pub fn kept_columns(category: Category) -> Vec<&'static str> {
    let extra = match category {
        Category::Info => return INFO_COLUMNS.to_vec(),
        Category::Misc => MISC_COLUMNS,
        Category::Gca => GCA_COLUMNS,
        Category::Defense => DEFENSE_COLUMNS,
        Category::Keeper => KEEPER_COLUMNS,
        Category::KeeperAdv => KEEPER_ADV_COLUMNS,
        Category::Passing => PASSING_COLUMNS,
        Category::PlayingTime => PLAYING_TIME_COLUMNS,
        Category::Shooting => SHOOTING_COLUMNS,
    };
    SAME_COLUMNS.iter().chain(extra.iter()).copied().collect()
}

/// `"DF (CB, right)"` -> `"DF"`; values without a parenthesis are returned unchanged.
pub fn general_position(position: &str) -> String {
    match position.split_once('(') {
        Some((head, _)) => head.trim().to_string(),
        None => position.to_string(),
    }
}

/// Keeps only `columns`, in the given order.
pub fn project(table: &Table, columns: &[&str]) -> StatsResult<Table> {
    let indices = columns
        .iter()
        .map(|c| table.column_index(c))
        .collect::<StatsResult<Vec<_>>>()?;
    let headers = columns.iter().map(|c| c.to_string()).collect();
    let mut out = Table::new(table.name(), headers, Vec::new());
    for row in 0..table.len() {
        out.push_row(
            indices
                .iter()
                .map(|&col| table.cell(row, col).to_string())
                .collect(),
        );
    }
    Ok(out)
}

/// Projects the info table and inserts `general_position` after `position`.
pub fn project_info(table: &Table) -> StatsResult<Table> {
    let projected = project(table, INFO_COLUMNS)?;
    let position_col = projected.column_index("position")?;
    let mut headers = projected.headers().to_vec();
    headers.insert(position_col + 1, "general_position".to_string());
    let rows = projected
        .rows()
        .iter()
        .map(|row| {
            let mut row = row.clone();
            let general = row
                .get(position_col)
                .map(|p| general_position(p))
                .unwrap_or_default();
            row.insert(position_col + 1, general);
            row
        })
        .collect();
    Ok(Table::new(projected.name(), headers, rows))
}

#[derive(Debug, Clone)]
pub struct WrittenTable {
    pub name: String,
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone)]
pub struct PreprocessSummary {
    pub out_dir: PathBuf,
    pub tables: Vec<WrittenTable>,
}

pub fn create_new_csv(out_dir: &Path, table: &Table) -> StatsResult<WrittenTable> {
    let path = out_dir.join(format!("{}.csv", table.name()));
    table.write_csv(&path)?;
    Ok(WrittenTable {
        name: table.name().to_string(),
        path,
        rows: table.len(),
        columns: table.headers().len(),
    })
}

/// Slims every category table from `raw_dir` into `out_dir`.
pub fn select_columns_from_files(raw_dir: &Path, out_dir: &Path) -> StatsResult<PreprocessSummary> {
    let raw = load_tables(raw_dir)?;
    select_columns(&raw, out_dir)
}

pub fn select_columns(
    raw: &HashMap<String, Table>,
    out_dir: &Path,
) -> StatsResult<PreprocessSummary> {
    fs::create_dir_all(out_dir).map_err(|source| StatsError::Io {
        path: out_dir.display().to_string(),
        source,
    })?;

    let mut written = Vec::new();
    for category in Category::ALL {
        let table = raw
            .get(category.stem())
            .ok_or_else(|| StatsError::MissingTable(category.stem().to_string()))?;
        let slim = match category {
            Category::Info => project_info(table)?,
            _ => project(table, &kept_columns(category))?,
        };
        let out = create_new_csv(out_dir, &slim)?;
        log::info!(
            "wrote {} ({} rows, {} columns)",
            out.path.display(),
            out.rows,
            out.columns
        );
        written.push(out);
    }

    Ok(PreprocessSummary {
        out_dir: out_dir.to_path_buf(),
        tables: written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_position_strips_parenthetical() {
        assert_eq!(general_position("DF (CB, right)"), "DF");
        assert_eq!(general_position("FW-MF (AM)"), "FW-MF");
        assert_eq!(general_position("GK"), "GK");
        assert_eq!(general_position(" MF "), " MF ");
    }

    #[test]
    fn kept_columns_start_with_shared_columns() {
        let cols = kept_columns(Category::Shooting);
        assert_eq!(&cols[..6], &SAME_COLUMNS);
        assert!(cols.contains(&"goals_per_shot"));
        assert_eq!(kept_columns(Category::Info)[0], "id");
    }
}
