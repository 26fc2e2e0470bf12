pub mod app;
pub mod completion;
pub mod config;
pub mod editor;
pub mod input;
pub mod logging;
pub mod project;
pub mod syntax;
pub mod theme;
pub mod ui;
