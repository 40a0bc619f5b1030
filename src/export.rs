use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::dashboard::PlayerProfile;
use crate::dataset::{Category, Dataset};
use crate::lookup::player_by_name;

#[derive(Debug)]
pub struct ExportReport {
    pub path: PathBuf,
    pub sheets: usize,
    pub season_rows: usize,
    pub skipped: Vec<String>,
}

/// `<dir>/<player>_<timestamp>.xlsx`, with the name reduced to safe characters.
pub fn report_path(dir: &Path, player_name: &str) -> PathBuf {
    let slug: String = player_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let slug = slug.trim_matches('_');
    let slug = if slug.is_empty() { "player" } else { slug };
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("{slug}_{stamp}.xlsx"))
}

/// Writes the player's profile and every per-season category table to one workbook.
pub fn export_player_report(data: &Dataset, player_name: &str, path: &Path) -> Result<ExportReport> {
    let info = player_by_name(data.players(), player_name)?;
    let profile = PlayerProfile::from_info(info);

    let mut profile_rows = vec![vec!["Field".to_string(), "Value".to_string()]];
    profile_rows.extend(
        profile
            .lines()
            .into_iter()
            .map(|(label, value)| vec![label.to_string(), value]),
    );
    profile_rows.push(vec![
        "General position".to_string(),
        profile.general_position.clone(),
    ]);
    profile_rows.push(vec![
        "Country of birth".to_string(),
        profile.country_of_birth.clone(),
    ]);

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Profile")?;
        write_rows(sheet, &profile_rows)?;
    }

    let mut sheets = 1usize;
    let mut season_rows = 0usize;
    let mut skipped = Vec::new();
    for category in Category::ALL {
        if category == Category::Info {
            continue;
        }
        let table = match data.table(category) {
            Ok(table) => table,
            Err(err) => {
                skipped.push(err.to_string());
                continue;
            }
        };
        let player_rows = match table.filter_by_id(info.id) {
            Ok(rows) => rows,
            Err(err) => {
                skipped.push(err.to_string());
                continue;
            }
        };

        let mut rows = vec![player_rows.headers().to_vec()];
        rows.extend(player_rows.rows().iter().cloned());
        season_rows += player_rows.len();

        let sheet = workbook.add_worksheet();
        sheet.set_name(category.stem())?;
        write_rows(sheet, &rows)?;
        sheets += 1;
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create export dir {}", dir.display()))?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        path: path.to_path_buf(),
        sheets,
        season_rows,
        skipped,
    })
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
