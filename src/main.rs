//! Terminal simulator and entry point.
//!
//! Drives the menu from the keyboard and prints each rendered frame to
//! stdout. Stands in for the device's buttons and display.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐   KeyEvents    ┌──────────────────────┐
//! │  stdin reader thread │ ─────────────→ │  App (main thread)   │ ─→ TextSurface (stdout)
//! │  (keymap)            │                │  menu loop           │
//! └──────────────────────┘                └──────────────────────┘
//!                                                    │ LedPattern
//!                                                    ▼
//!                                         ┌──────────────────────┐
//!                                         │  led thread (log)    │
//!                                         └──────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```text
//! lcdmenu [config=<file.toml>] [key=value ...]
//! ```
//!
//! `key=value` pairs override the configuration file; see
//! [`lcdmenu::Config::with_overrides`]. `log_file=default` sends logs to
//! the state directory instead of stderr. Keys are read line by line:
//! `w`/`s`/`a`/`d` move, `e` enters, `q` escapes and `x` (or end of input)
//! exits.

use lcdmenu::app::{command_for, Command};
use lcdmenu::input::{virtual_buttons, CancelSource, LedPattern};
use lcdmenu::observability::init_tracing;
use lcdmenu::ui::TextSurface;
use lcdmenu::{initialize, Config, Result};
use std::collections::BTreeMap;
use std::io::BufRead;
use std::thread;
use tracing::{error, info};

fn main() {
    if let Err(e) = run() {
        error!(error = %e, "lcdmenu failed");
        eprintln!("lcdmenu: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = load_config(std::env::args().skip(1))?;
    init_tracing(&config);
    info!(version = env!("CARGO_PKG_VERSION"), "lcdmenu starting");

    let (leds, patterns) = crossbeam_channel::bounded::<LedPattern>(16);
    thread::Builder::new()
        .name("led".to_string())
        .spawn(move || {
            for pattern in patterns {
                info!(color = ?pattern.color, effect = ?pattern.effect, "status led");
            }
        })?;

    let (driver, buttons) = virtual_buttons::channel();
    thread::Builder::new()
        .name("keyboard".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                for command in line.chars().filter_map(command_for) {
                    match command {
                        Command::Key(key) => {
                            if !driver.tap(key) {
                                return;
                            }
                        }
                        Command::Exit => return,
                    }
                }
            }
        })?;

    let surface = TextSurface::stdout(config.display.width, config.display.height);
    let mut app = initialize(&config, buttons.with_led_sink(leds), surface);
    app.run(&CancelSource::new().token());

    info!("lcdmenu stopped");
    Ok(())
}

/// Splits `key=value` arguments, loading `config=<path>` first.
fn load_config(args: impl Iterator<Item = String>) -> Result<Config> {
    let mut overrides: BTreeMap<String, String> = args
        .filter_map(|arg| {
            arg.split_once('=')
                .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        })
        .collect();

    let base = match overrides.remove("config") {
        Some(path) => Config::from_file(lcdmenu::infrastructure::expand_tilde(&path))?,
        None => Config::default(),
    };
    Ok(base.with_overrides(&overrides))
}
