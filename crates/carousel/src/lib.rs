pub mod app;
pub mod cli;
pub mod color;
pub mod commands;
pub mod compositor;
pub mod config;
pub mod drag;
pub mod editor;
pub mod export;
pub mod generate;
pub mod history;
pub mod model;
pub mod store;
pub mod theme;

#[cfg(test)]
mod tests;
