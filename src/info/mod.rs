//! Device information gathering.
//!
//! The device item shows firmware and image versions, the runtime it runs
//! on and its network address. Each of those comes from a provider trait so
//! the host simulator, tests and the real device can plug in their own
//! sources. Providers may block or fail; they are only ever called from a
//! background operation, never from the UI thread.
//!
//! # Modules
//!
//! - [`sources`]: Provider implementations (version file, UDP probe, host environment)
//! - [`item`]: The device information menu item
//!
//! # Example
//!
//! ```
//! use lcdmenu::info::{InfoSources, StaticNetwork, StaticVersionSource, HostEnvironment, Versions};
//!
//! let sources = InfoSources::new(
//!     StaticVersionSource::new(Versions::new("1.2.0", "2024-01")),
//!     StaticNetwork::new("10.0.0.7"),
//!     HostEnvironment,
//! );
//! let snapshot = sources.gather().unwrap();
//! assert_eq!(snapshot.ip_address(), "10.0.0.7");
//! ```

pub mod item;
pub mod sources;

pub use item::DeviceInfoItem;
pub use sources::{
    FileVersionSource, HostEnvironment, StaticNetwork, StaticVersionSource, UdpProbeNetwork,
};

use crate::domain::{InfoSnapshot, Result};
use crate::DeviceConfig;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Installed firmware and image version identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Versions {
    pub firmware: String,
    pub image: String,
}

impl Versions {
    pub fn new(firmware: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            firmware: firmware.into(),
            image: image.into(),
        }
    }
}

/// Source of the installed version identifiers.
pub trait VersionSource: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when the versions cannot be read.
    fn installed_versions(&self) -> Result<Versions>;
}

/// Source of the current network address.
pub trait NetworkSource: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when the device has no usable address.
    fn ip_address(&self) -> Result<String>;
}

/// Description of the runtime the menu runs on.
pub trait EnvironmentSource: Send + Sync {
    /// Runtime version, `None` when it cannot be determined.
    fn runtime_version(&self) -> Option<String>;

    fn runtime_identifier(&self) -> String;
}

/// The three providers a snapshot is built from.
#[derive(Clone)]
pub struct InfoSources {
    versions: Arc<dyn VersionSource>,
    network: Arc<dyn NetworkSource>,
    environment: Arc<dyn EnvironmentSource>,
}

impl InfoSources {
    pub fn new(
        versions: impl VersionSource + 'static,
        network: impl NetworkSource + 'static,
        environment: impl EnvironmentSource + 'static,
    ) -> Self {
        Self {
            versions: Arc::new(versions),
            network: Arc::new(network),
            environment: Arc::new(environment),
        }
    }

    /// Providers described by the `[device]` configuration section.
    ///
    /// A version file wins over fixed version strings, and a fixed address
    /// wins over probing.
    #[must_use]
    pub fn from_config(device: &DeviceConfig) -> Self {
        let versions: Arc<dyn VersionSource> = match &device.version_file {
            Some(path) => Arc::new(FileVersionSource::new(path)),
            None => Arc::new(StaticVersionSource::new(Versions::new(
                &device.firmware,
                &device.image,
            ))),
        };
        let network: Arc<dyn NetworkSource> = match &device.ip_address {
            Some(address) => Arc::new(StaticNetwork::new(address)),
            None => Arc::new(UdpProbeNetwork::new(&device.ip_probe_target)),
        };
        Self {
            versions,
            network,
            environment: Arc::new(HostEnvironment),
        }
    }

    /// Queries every provider and builds one snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first provider error; nothing is built in that case.
    pub fn gather(&self) -> Result<InfoSnapshot> {
        gather_snapshot(
            self.versions.as_ref(),
            self.network.as_ref(),
            self.environment.as_ref(),
        )
    }
}

impl std::fmt::Debug for InfoSources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfoSources").finish_non_exhaustive()
    }
}

/// Builds a snapshot from the given providers.
///
/// # Errors
///
/// Returns the first provider error.
pub fn gather_snapshot(
    versions: &dyn VersionSource,
    network: &dyn NetworkSource,
    environment: &dyn EnvironmentSource,
) -> Result<InfoSnapshot> {
    let runtime_version = environment.runtime_version();
    let runtime_identifier = environment.runtime_identifier();
    let installed = versions.installed_versions()?;
    let ip_address = network.ip_address()?;
    debug!(firmware = %installed.firmware, %ip_address, "device information gathered");

    Ok(InfoSnapshot::new(
        installed.firmware,
        installed.image,
        runtime_version,
        runtime_identifier,
        ip_address,
    ))
}
