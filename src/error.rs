use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("{0} is not a valid player")]
    NotAPlayer(String),

    #[error("no player with id {0}")]
    UnknownPlayerId(u32),

    #[error("table `{0}` was not loaded")]
    MissingTable(String),

    #[error("table `{table}` has no column `{column}`")]
    MissingColumn { table: String, column: String },

    #[error("unknown {kind} `{value}`")]
    UnknownCategory { kind: &'static str, value: String },

    #[error("cannot order season label `{0}`")]
    SeasonOrder(String),

    #[error("csv error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type StatsResult<T> = std::result::Result<T, StatsError>;
