use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{StatsError, StatsResult};
use crate::preprocess::general_position;

/// Cell text written for absent values.
pub const NULL_CELL: &str = "NULL";

static DATASET: OnceCell<Dataset> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Info,
    Misc,
    Gca,
    Defense,
    Keeper,
    KeeperAdv,
    Passing,
    PlayingTime,
    Shooting,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Info,
        Category::Misc,
        Category::Gca,
        Category::Defense,
        Category::Keeper,
        Category::KeeperAdv,
        Category::Passing,
        Category::PlayingTime,
        Category::Shooting,
    ];

    pub fn stem(self) -> &'static str {
        match self {
            Category::Info => "info",
            Category::Misc => "misc",
            Category::Gca => "gca",
            Category::Defense => "defense",
            Category::Keeper => "keeper",
            Category::KeeperAdv => "keeper_adv",
            Category::Passing => "passing",
            Category::PlayingTime => "playing_time",
            Category::Shooting => "shooting",
        }
    }

    pub fn from_stem(stem: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.stem() == stem)
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Info => "Info",
            Category::Misc => "Misc",
            Category::Gca => "Goal-creating actions",
            Category::Defense => "Defense",
            Category::Keeper => "Keeper",
            Category::KeeperAdv => "Keeper (advanced)",
            Category::Passing => "Passing",
            Category::PlayingTime => "Playing time",
            Category::Shooting => "Shooting",
        }
    }
}

/// A CSV file held as string cells. Cells are interpreted on access.
#[derive(Debug, Clone, Default)]
pub struct Table {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    pub fn from_reader<R: Read>(name: &str, rdr: R) -> Result<Self, csv::Error> {
        let mut reader = csv::Reader::from_reader(rdr);
        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect::<Vec<_>>();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self::new(name, headers, rows))
    }

    pub fn from_path(path: &Path) -> StatsResult<Self> {
        let name = table_name(path);
        let file = fs::File::open(path).map_err(|source| StatsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(&name, file).map_err(|source| StatsError::Csv {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn write_csv(&self, path: &Path) -> StatsResult<()> {
        let csv_err = |source| StatsError::Csv {
            path: path.display().to_string(),
            source,
        };
        let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
        writer.write_record(&self.headers).map_err(csv_err)?;
        for row in &self.rows {
            let cells = row.iter().map(|cell| {
                if cell.trim().is_empty() {
                    NULL_CELL
                } else {
                    cell.as_str()
                }
            });
            writer.write_record(cells).map_err(csv_err)?;
        }
        writer.flush().map_err(|source| StatsError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    pub fn column_index(&self, column: &str) -> StatsResult<usize> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| StatsError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Cell text, or "" for short rows.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn column(&self, column: &str) -> StatsResult<Vec<&str>> {
        let idx = self.column_index(column)?;
        Ok((0..self.rows.len()).map(|row| self.cell(row, idx)).collect())
    }

    /// Rows belonging to one player, in stored order. An unknown id gives an empty table.
    pub fn filter_by_id(&self, id: u32) -> StatsResult<Table> {
        let id_col = self.column_index("id")?;
        let rows = self
            .rows
            .iter()
            .filter(|row| row.get(id_col).and_then(|c| parse_id(c)) == Some(id))
            .cloned()
            .collect();
        Ok(Table::new(self.name.clone(), self.headers.clone(), rows))
    }

    pub(crate) fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

/// `NULL`, empty and non-numeric cells read as absent.
pub fn parse_f64(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NULL_CELL) || trimmed == "NaN" {
        return None;
    }
    trimmed.replace(',', "").parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Ids may be written as `12` or `12.0`.
pub fn parse_id(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if let Ok(id) = trimmed.parse::<u32>() {
        return Some(id);
    }
    let value = trimmed.parse::<f64>().ok()?;
    if value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}

fn table_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Loads every `*.csv` in `dir`, keyed by file stem.
pub fn load_tables(dir: &Path) -> StatsResult<HashMap<String, Table>> {
    let entries = fs::read_dir(dir).map_err(|source| StatsError::Io {
        path: dir.display().to_string(),
        source,
    })?;
    let mut paths: Vec<PathBuf> = entries
        .map(|entry| {
            entry.map(|e| e.path()).map_err(|source| StatsError::Io {
                path: dir.display().to_string(),
                source,
            })
        })
        .collect::<StatsResult<Vec<_>>>()?
        .into_iter()
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    paths.sort();

    let tables: Vec<Table> = paths
        .par_iter()
        .map(|path| Table::from_path(path))
        .collect::<StatsResult<Vec<_>>>()?;

    log::info!("loaded {} tables from {}", tables.len(), dir.display());
    Ok(tables
        .into_iter()
        .map(|table| (table.name().to_string(), table))
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerInfo {
    pub id: u32,
    pub name: String,
    pub general_position: String,
    pub position: String,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub nt: String,
    pub countryob: String,
    pub club: String,
    pub age: Option<f64>,
}

/// Reads player records out of an info table. Raw info tables without
/// `general_position` get it derived from `position`.
pub fn players_from_table(table: &Table) -> StatsResult<Vec<PlayerInfo>> {
    let id = table.column_index("id")?;
    let name = table.column_index("name")?;
    let position = table.column_index("position")?;
    let general = if table.has_column("general_position") {
        Some(table.column_index("general_position")?)
    } else {
        None
    };
    let height = table.column_index("height")?;
    let weight = table.column_index("weight")?;
    let nt = table.column_index("nt")?;
    let countryob = table.column_index("countryob")?;
    let club = table.column_index("club")?;
    let age = table.column_index("age")?;

    let mut players = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let Some(player_id) = parse_id(table.cell(row, id)) else {
            log::warn!(
                "skipping {} row {row}: bad id `{}`",
                table.name(),
                table.cell(row, id)
            );
            continue;
        };
        let raw_position = text_cell(table.cell(row, position));
        let general_position = match general {
            Some(col) => text_cell(table.cell(row, col)),
            None => general_position(&raw_position),
        };
        players.push(PlayerInfo {
            id: player_id,
            name: table.cell(row, name).trim().to_string(),
            general_position,
            position: raw_position,
            height: parse_f64(table.cell(row, height)),
            weight: parse_f64(table.cell(row, weight)),
            nt: text_cell(table.cell(row, nt)),
            countryob: text_cell(table.cell(row, countryob)),
            club: text_cell(table.cell(row, club)),
            age: parse_f64(table.cell(row, age)),
        });
    }
    Ok(players)
}

fn text_cell(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case(NULL_CELL) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// Every table of the slim export plus the parsed player records.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    players: Vec<PlayerInfo>,
    tables: HashMap<String, Table>,
}

impl Dataset {
    pub fn load(dir: &Path) -> StatsResult<Self> {
        Self::from_tables(load_tables(dir)?)
    }

    pub fn from_tables(tables: HashMap<String, Table>) -> StatsResult<Self> {
        let info = tables
            .get(Category::Info.stem())
            .ok_or_else(|| StatsError::MissingTable(Category::Info.stem().to_string()))?;
        let players = players_from_table(info)?;
        for category in Category::ALL {
            if !tables.contains_key(category.stem()) {
                log::warn!("table `{}` is missing; its charts will be empty", category.stem());
            }
        }
        Ok(Self { players, tables })
    }

    pub fn players(&self) -> &[PlayerInfo] {
        &self.players
    }

    pub fn table(&self, category: Category) -> StatsResult<&Table> {
        self.tables
            .get(category.stem())
            .ok_or_else(|| StatsError::MissingTable(category.stem().to_string()))
    }

    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort();
        names
    }
}

/// Loads the process-wide dataset on first call; later calls return the same instance.
pub fn init_global(dir: &Path) -> StatsResult<&'static Dataset> {
    DATASET.get_or_try_init(|| Dataset::load(dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_f64_treats_null_as_absent() {
        assert_eq!(parse_f64("NULL"), None);
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64(" 12.5 "), Some(12.5));
        assert_eq!(parse_f64("1,234"), Some(1234.0));
    }

    #[test]
    fn parse_id_accepts_float_text() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("42.0"), Some(42));
        assert_eq!(parse_id("42.5"), None);
        assert_eq!(parse_id("x"), None);
    }

    #[test]
    fn load_tables_skips_non_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("misc.csv"), "id,season\n1,2019-2020\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a table").unwrap();
        fs::create_dir(dir.path().join("nested.csv")).unwrap();
        let tables = load_tables(dir.path()).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables["misc"].len(), 1);
    }

    #[test]
    fn load_tables_reports_unreadable_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        let err = load_tables(&missing).unwrap_err();
        assert!(matches!(err, StatsError::Io { ref path, .. } if path.ends_with("gone")));
    }

    #[test]
    fn filter_by_unknown_id_is_empty() {
        let csv = "id,season,squad\n1,2019-2020,A\n2,2019-2020,B\n";
        let table = Table::from_reader("misc", csv.as_bytes()).unwrap();
        assert!(table.filter_by_id(9).unwrap().is_empty());
        assert_eq!(table.filter_by_id(2).unwrap().len(), 1);
    }
}
