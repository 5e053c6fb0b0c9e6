//! Device information snapshot.
//!
//! An [`InfoSnapshot`] is produced once by a successful background query and
//! cached by the item that started it. It is never edited in place: a later
//! refresh builds a whole new snapshot and replaces the old one.

use chrono::{DateTime, Utc};

/// Number of characters of the runtime version shown on the display.
const RUNTIME_VERSION_DISPLAY_CHARS: usize = 7;

/// Text shown when the runtime version provider is missing.
pub const UNKNOWN_VERSION: &str = "Unknown";

/// Immutable record of the device's firmware, runtime and network identity.
///
/// `runtime_version` is `None` when no runtime version provider is available;
/// the display layer shows [`UNKNOWN_VERSION`] in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoSnapshot {
    firmware_version: String,
    image_version: String,
    runtime_version: Option<String>,
    runtime_identifier: String,
    ip_address: String,
    captured_at: DateTime<Utc>,
}

impl InfoSnapshot {
    /// Builds a snapshot from fully gathered values.
    ///
    /// Every field is required up front; there is no partially built
    /// snapshot.
    #[must_use]
    pub fn new(
        firmware_version: String,
        image_version: String,
        runtime_version: Option<String>,
        runtime_identifier: String,
        ip_address: String,
    ) -> Self {
        Self {
            firmware_version,
            image_version,
            runtime_version,
            runtime_identifier,
            ip_address,
            captured_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn firmware_version(&self) -> &str {
        &self.firmware_version
    }

    #[must_use]
    pub fn image_version(&self) -> &str {
        &self.image_version
    }

    #[must_use]
    pub fn runtime_version(&self) -> Option<&str> {
        self.runtime_version.as_deref()
    }

    #[must_use]
    pub fn runtime_identifier(&self) -> &str {
        &self.runtime_identifier
    }

    #[must_use]
    pub fn ip_address(&self) -> &str {
        &self.ip_address
    }

    /// When the snapshot was gathered.
    #[must_use]
    pub const fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Runtime version as shown on the display.
    ///
    /// Long display names are cut to their first seven characters, which is
    /// enough for a `major.minor.patch` prefix on a narrow LCD.
    ///
    /// # Example
    ///
    /// ```
    /// use lcdmenu::InfoSnapshot;
    ///
    /// let snapshot = InfoSnapshot::new(
    ///     "1.2.0".into(),
    ///     "1.1.0".into(),
    ///     Some("3.12.1 (tarball Fri Oct 17)".into()),
    ///     "armv5te-linux".into(),
    ///     "10.0.0.7".into(),
    /// );
    /// assert_eq!(snapshot.display_runtime_version(), "3.12.1 ");
    /// ```
    #[must_use]
    pub fn display_runtime_version(&self) -> String {
        self.runtime_version.as_ref().map_or_else(
            || UNKNOWN_VERSION.to_string(),
            |version| version.chars().take(RUNTIME_VERSION_DISPLAY_CHARS).collect(),
        )
    }

    /// The five labelled lines of the information screen.
    #[must_use]
    pub fn display_lines(&self) -> [String; 5] {
        [
            format!("Firmware: {}", self.firmware_version),
            format!("Image: {}", self.image_version),
            format!("Runtime: {}", self.display_runtime_version()),
            format!("Runtime id: {}", self.runtime_identifier),
            format!("IP: {}", self.ip_address),
        ]
    }
}
