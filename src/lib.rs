pub mod analyzers;
pub mod charts;
pub mod fetch;
pub mod filter;
pub mod heatmap;
pub mod infra;
pub mod loader;
pub mod output;
pub mod parser;
pub mod report;
pub mod state;
pub mod timeline;
