pub mod args;
pub mod db;
pub mod engine;
pub mod grid;
pub mod logging;
pub mod mode;
pub mod record;
pub mod session;
pub mod stats;
pub mod ui;
