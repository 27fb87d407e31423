// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! Serum Writer - Main Entry Point
//!
//! A distraction-free writer for Markdown, reStructuredText, Textile and HTML.
//! Built with Rust and egui.

mod app;
mod config;
mod document;
mod editor;
mod error;
mod events;
mod export;
mod files;
mod highlight;
mod plugins;
mod preview;
mod spellcheck;
mod string_utils;
mod theme;
mod ui;

use std::path::PathBuf;

use app::{SerumApp, StartupOptions};
use clap::Parser;
use config::{load_config, Settings};
use log::{info, warn};

/// Application name constant.
const APP_NAME: &str = "Serum Writer";

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "serum-writer", version, about)]
struct Cli {
    /// File to open on startup
    file: Option<PathBuf>,

    /// Treat every document as Markdown regardless of its extension
    #[arg(short = 'm', long = "markdown")]
    markdown: bool,
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    info!("Starting {}", APP_NAME);

    let file = cli.file.filter(|path| {
        let exists = path.is_file();
        if !exists {
            warn!("Ignoring missing file {}", path.display());
        }
        exists
    });

    let settings = load_config();
    let window_size = &settings.window_size;
    info!(
        "Window configuration: {}x{}, maximized: {}",
        window_size.width, window_size.height, window_size.maximized
    );

    // Native decorations are replaced by the custom title bar.
    let viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_decorations(false)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([Settings::MIN_WINDOW_SIZE, Settings::MIN_WINDOW_SIZE])
        .with_maximized(window_size.maximized)
        .with_drag_and_drop(true);

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let startup = StartupOptions {
        file,
        force_markdown: cli.markdown,
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| Ok(Box::new(SerumApp::new(cc, settings, startup)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["serum-writer"]).unwrap();
        assert!(cli.file.is_none());
        assert!(!cli.markdown);
    }

    #[test]
    fn test_cli_file_and_markdown_flag() {
        let cli = Cli::try_parse_from(["serum-writer", "-m", "notes.txt"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("notes.txt")));
        assert!(cli.markdown);

        let cli = Cli::try_parse_from(["serum-writer", "--markdown"]).unwrap();
        assert!(cli.markdown);
    }
}
