//! lcdmenu: focus-routed menus and modal background tasks for small
//! button-driven LCD devices.
//!
//! lcdmenu provides:
//! - A menu tree where exactly one path from the root holds keyboard focus
//! - Key routing from six physical buttons to the focused item
//! - Modal progress dialogs running long operations on a worker thread
//! - A device information page gathered in the background and cached
//! - Status LED feedback while operations run and when they finish

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Simulator (main.rs)                                │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Event loop
//! │  - Key wait / dispatch / release                    │
//! │  - Completion pump, LED side channel, redraw        │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Focus Layer   │   │ Modal Layer   │   │ Info Layer    │
//! │ (focus/)      │   │ (modal/)      │   │ (info/)       │
//! │ - Node arena  │   │ - Task handle │   │ - Providers   │
//! │ - Routing     │   │ - Progress    │   │ - Device item │
//! │ - Rendering   │   │   dialog      │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Input, UI, Infrastructure & Domain Layers          │
//! │  - Buttons, LEDs, cancellation (input/)             │
//! │  - Render surfaces and layout (ui/)                 │
//! │  - Paths (infrastructure/)                          │
//! │  - Errors, info snapshot (domain/)                  │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing subscriber, rotating log file            │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Event loop driving the menu
//! - [`domain`]: Core domain types (info snapshot, errors)
//! - [`focus`]: Menu tree, focus protocol and key routing
//! - [`info`]: Device information providers and menu item
//! - [`infrastructure`]: Path resolution
//! - [`input`]: Button and LED contract, cancellation tokens
//! - [`modal`]: Background operations behind a progress dialog
//! - [`observability`]: Logging setup
//! - [`ui`]: Render surfaces and page layout
//!
//! # Configuration
//!
//! Configuration is a TOML file; every key is optional:
//!
//! ```toml
//! trace_level = "debug"
//! log_file = "default"  # state dir log file, or any path (`~` allowed)
//! menu_title = "Main menu"
//!
//! [display]
//! width = 178
//! height = 128
//! title_font = "medium"
//! item_font = "medium"
//! content_font = "small"
//!
//! [device]
//! version_file = "/etc/device-version.toml"
//! ip_probe_target = "8.8.8.8:80"
//!
//! [info]
//! title = "Getting Info"
//! working = "Loading"
//! failed = "Failed to load info"
//! ```
//!
//! # Examples
//!
//! ```rust
//! use lcdmenu::input::{virtual_buttons, Key};
//! use lcdmenu::ui::RecordingSurface;
//! use lcdmenu::{initialize, Config};
//!
//! let mut config = Config::default();
//! config.device.ip_address = Some("10.0.0.5".to_string());
//!
//! let (driver, buttons) = virtual_buttons::channel();
//! let mut app = initialize(&config, buttons, RecordingSurface::new(178, 128));
//! app.start();
//!
//! driver.tap(Key::Enter);
//! app.step();
//! app.settle();
//! assert!(app.surface().contains_text("IP: 10.0.0.5"));
//! ```

pub mod app;
pub mod domain;
pub mod focus;
pub mod info;
pub mod infrastructure;
pub mod input;
pub mod modal;
pub mod observability;
pub mod ui;

pub use app::App;
pub use domain::{InfoSnapshot, LcdMenuError, Result};
pub use focus::{MenuItem, Navigator};
pub use ui::{Font, RenderSurface};

use info::{DeviceInfoItem, InfoSources};
use infrastructure::{expand_tilde, resolve_log_file};
use input::Buttons;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Menu configuration.
///
/// Loaded from TOML with [`Config::from_file`], or built from `key=value`
/// pairs with [`Config::from_map`]. Missing values take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tracing filter directive.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any
    /// `EnvFilter` directive. `RUST_LOG` overrides it. Default: `"info"`
    pub trace_level: String,

    /// Log file path. `"default"` stands for the file in the state
    /// directory, see [`infrastructure::default_log_file`]. Logs go to
    /// stderr when unset.
    pub log_file: Option<PathBuf>,

    /// Title of the root menu. Default: `"Main menu"`
    pub menu_title: String,

    pub display: DisplayConfig,
    pub device: DeviceConfig,
    pub info: InfoDialogConfig,
}

/// Display geometry and fonts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Width in pixels. Default: 178
    pub width: u32,
    /// Height in pixels. Default: 128
    pub height: u32,
    pub title_font: Font,
    pub item_font: Font,
    /// Font of the device information page.
    pub content_font: Font,
}

/// Where device information comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// TOML file with `firmware` and `image` keys. Takes precedence over
    /// `firmware` and `image`.
    pub version_file: Option<PathBuf>,
    pub firmware: String,
    pub image: String,
    /// Fixed address. When unset, the address is probed.
    pub ip_address: Option<String>,
    /// Address the UDP probe routes towards. Default: `"8.8.8.8:80"`
    pub ip_probe_target: String,
}

/// Strings of the device information progress dialog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InfoDialogConfig {
    pub title: String,
    pub working: String,
    pub failed: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trace_level: "info".to_string(),
            log_file: None,
            menu_title: "Main menu".to_string(),
            display: DisplayConfig::default(),
            device: DeviceConfig::default(),
            info: InfoDialogConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 178,
            height: 128,
            title_font: Font::Medium,
            item_font: Font::Medium,
            content_font: Font::Medium,
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            version_file: None,
            firmware: env!("CARGO_PKG_VERSION").to_string(),
            image: "host".to_string(),
            ip_address: None,
            ip_probe_target: "8.8.8.8:80".to_string(),
        }
    }
}

impl Default for InfoDialogConfig {
    fn default() -> Self {
        Self {
            title: "Getting Info".to_string(),
            working: "Loading".to_string(),
            failed: "Failed to load info".to_string(),
        }
    }
}

impl Config {
    /// Loads a TOML configuration file. `~` in path values is expanded.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid
    /// configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| LcdMenuError::Config(format!("{}: {e}", path.display())))?;
        Ok(config.with_expanded_paths())
    }

    /// Builds configuration from `key=value` pairs over the defaults.
    ///
    /// See [`Config::with_overrides`] for the recognized keys.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use lcdmenu::{Config, Font};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("width".to_string(), "128".to_string());
    /// map.insert("item_font".to_string(), "small".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.display.width, 128);
    /// assert_eq!(config.display.item_font, Font::Small);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        Self::default().with_overrides(map)
    }

    /// Replaces values named in `map`, keeping the rest.
    ///
    /// # Parsing Rules
    ///
    /// - `trace_level`, `menu_title`, `firmware`, `image`, `ip_address`,
    ///   `ip_probe_target`, `info_title`, `info_working`, `info_failed`:
    ///   taken as is
    /// - `log_file`: path with `~` expanded, or `default` for the state
    ///   directory log file
    /// - `version_file`: path, `~` expanded
    /// - `width`, `height`: `u32`, unparsable values are ignored
    /// - `title_font`, `item_font`, `content_font`: `small`, `medium` or
    ///   `large`, anything else is ignored
    #[must_use]
    pub fn with_overrides(mut self, map: &BTreeMap<String, String>) -> Self {
        let text = |key: &str| map.get(key).map(|value| value.trim().to_string());
        let number = |key: &str| map.get(key).and_then(|value| value.trim().parse::<u32>().ok());
        let font = |key: &str| map.get(key).and_then(|value| parse_font(value));
        let path = |key: &str| map.get(key).map(|value| expand_tilde(value.trim()));

        if let Some(level) = text("trace_level") {
            self.trace_level = level;
        }
        if let Some(log_file) = map.get("log_file") {
            self.log_file = Some(resolve_log_file(log_file));
        }
        if let Some(title) = text("menu_title") {
            self.menu_title = title;
        }

        let display = &mut self.display;
        display.width = number("width").unwrap_or(display.width);
        display.height = number("height").unwrap_or(display.height);
        display.title_font = font("title_font").unwrap_or(display.title_font);
        display.item_font = font("item_font").unwrap_or(display.item_font);
        display.content_font = font("content_font").unwrap_or(display.content_font);

        let device = &mut self.device;
        if let Some(version_file) = path("version_file") {
            device.version_file = Some(version_file);
        }
        device.firmware = text("firmware").unwrap_or_else(|| device.firmware.clone());
        device.image = text("image").unwrap_or_else(|| device.image.clone());
        if let Some(address) = text("ip_address") {
            device.ip_address = Some(address);
        }
        if let Some(target) = text("ip_probe_target") {
            device.ip_probe_target = target;
        }

        let info = &mut self.info;
        info.title = text("info_title").unwrap_or_else(|| info.title.clone());
        info.working = text("info_working").unwrap_or_else(|| info.working.clone());
        info.failed = text("info_failed").unwrap_or_else(|| info.failed.clone());

        self
    }

    fn with_expanded_paths(mut self) -> Self {
        let expand = |path: PathBuf| match path.to_str() {
            Some(text) => expand_tilde(text),
            None => path,
        };
        self.log_file = self.log_file.map(|path| match path.to_str() {
            Some(text) => resolve_log_file(text),
            None => path,
        });
        self.device.version_file = self.device.version_file.map(expand);
        self
    }
}

fn parse_font(name: &str) -> Option<Font> {
    match name.trim().to_ascii_lowercase().as_str() {
        "small" => Some(Font::Small),
        "medium" => Some(Font::Medium),
        "large" => Some(Font::Large),
        _ => None,
    }
}

/// Builds the default menu: a root container holding the device
/// information page.
#[must_use]
pub fn build_menu(config: &Config) -> Navigator {
    let mut navigator = Navigator::new(&config.menu_title)
        .with_fonts(config.display.title_font, config.display.item_font);

    let info = &config.info;
    let item = DeviceInfoItem::with_sources(
        InfoSources::from_config(&config.device),
        &info.title,
        &info.working,
        &info.failed,
    )
    .with_content_font(config.display.content_font);
    navigator.add_item(navigator.root(), item);

    navigator
}

/// Initializes the menu with configuration.
///
/// Creates an [`App`] over the given input backend and render surface with
/// the menu from [`build_menu`]. Tracing is set up separately with
/// [`observability::init_tracing`].
///
/// # Example
///
/// ```rust
/// use lcdmenu::input::virtual_buttons;
/// use lcdmenu::ui::RecordingSurface;
/// use lcdmenu::{initialize, Config};
///
/// let (_driver, buttons) = virtual_buttons::channel();
/// let mut app = initialize(&Config::default(), buttons, RecordingSurface::new(178, 128));
/// app.start();
/// assert!(app.surface().contains_text("Device information"));
/// ```
pub fn initialize<B, S>(config: &Config, buttons: B, surface: S) -> App<B, S>
where
    B: Buttons,
    S: RenderSurface,
{
    tracing::debug!(title = %config.menu_title, "initializing menu");
    App::new(build_menu(config), buttons, surface)
}
