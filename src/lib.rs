pub mod charts;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod export;
pub mod figure;
pub mod lookup;
pub mod positions;
pub mod preprocess;
pub mod server;
pub mod state;
pub mod tenure;
pub mod timing;
