pub mod ai;
pub mod completion;
pub mod config;
pub mod export;
pub mod generate;
pub mod themes;
