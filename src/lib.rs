pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod imaging;
pub mod sheet;
pub mod still_camera;
