//! Provider implementations for the host and the device.

use super::{EnvironmentSource, NetworkSource, VersionSource, Versions};
use crate::domain::{LcdMenuError, Result};
use std::net::UdpSocket;
use std::path::{Path, PathBuf};

/// Versions read from a TOML file with `firmware` and `image` keys.
///
/// The file is read on every query, so an update installed while the menu
/// runs shows up on the next refresh.
#[derive(Debug, Clone)]
pub struct FileVersionSource {
    path: PathBuf,
}

impl FileVersionSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl VersionSource for FileVersionSource {
    fn installed_versions(&self) -> Result<Versions> {
        let content = std::fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            LcdMenuError::Device(format!("invalid version file {}: {e}", self.path.display()))
        })
    }
}

/// Fixed versions.
#[derive(Debug, Clone)]
pub struct StaticVersionSource {
    versions: Versions,
}

impl StaticVersionSource {
    #[must_use]
    pub const fn new(versions: Versions) -> Self {
        Self { versions }
    }
}

impl VersionSource for StaticVersionSource {
    fn installed_versions(&self) -> Result<Versions> {
        Ok(self.versions.clone())
    }
}

/// Address of the interface that routes towards a probe target.
///
/// Connecting a UDP socket only selects a route; no packet is sent.
#[derive(Debug, Clone)]
pub struct UdpProbeNetwork {
    target: String,
}

impl UdpProbeNetwork {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

impl NetworkSource for UdpProbeNetwork {
    fn ip_address(&self) -> Result<String> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        socket
            .connect(&self.target)
            .map_err(|e| LcdMenuError::Network(format!("no route to {}: {e}", self.target)))?;
        let address = socket.local_addr()?.ip();
        if address.is_unspecified() {
            return Err(LcdMenuError::Network("no local address assigned".to_string()));
        }
        Ok(address.to_string())
    }
}

/// Fixed address.
#[derive(Debug, Clone)]
pub struct StaticNetwork {
    address: String,
}

impl StaticNetwork {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

impl NetworkSource for StaticNetwork {
    fn ip_address(&self) -> Result<String> {
        Ok(self.address.clone())
    }
}

/// The running menu build and the platform it was compiled for.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostEnvironment;

impl EnvironmentSource for HostEnvironment {
    fn runtime_version(&self) -> Option<String> {
        option_env!("CARGO_PKG_VERSION").map(ToString::to_string)
    }

    fn runtime_identifier(&self) -> String {
        format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS)
    }
}
