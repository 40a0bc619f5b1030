use anyhow::{Context, Result};

use soccer_dash::config::DashConfig;
use soccer_dash::preprocess;

fn main() -> Result<()> {
    DashConfig::load_env_files();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let mut config = DashConfig::from_env();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    config.apply_args(&args);

    let summary = preprocess::select_columns_from_files(&config.raw_dir, &config.data_dir)
        .with_context(|| {
            format!(
                "slim {} into {}",
                config.raw_dir.display(),
                config.data_dir.display()
            )
        })?;

    println!("Column selection complete");
    println!("Out: {}", summary.out_dir.display());
    for table in &summary.tables {
        println!(
            " - {:<14} {:>6} rows  {:>2} columns",
            table.name, table.rows, table.columns
        );
    }
    Ok(())
}
