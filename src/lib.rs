pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod nav;
pub mod platform;
pub mod sequence;
