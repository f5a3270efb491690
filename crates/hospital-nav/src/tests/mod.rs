mod config;
mod tray;
