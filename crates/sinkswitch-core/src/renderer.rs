//! Renderer services (Bluetooth sink, AirPlay, UPnP) and their on/off flags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::capability::ServiceManager;
use crate::error::RendererError;
use crate::session::Session;

/// A network renderer the player can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererService {
    /// Bluetooth audio sink
    Bluetooth,
    /// AirPlay receiver
    Airplay,
    /// UPnP media renderer
    Upnp,
}

impl RendererService {
    /// All renderer services.
    pub const ALL: [Self; 3] = [Self::Bluetooth, Self::Airplay, Self::Upnp];

    /// Name accepted on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bluetooth => "bluetooth",
            Self::Airplay => "airplay",
            Self::Upnp => "upnp",
        }
    }

    /// Session field recording whether the service is on.
    #[must_use]
    pub fn flag_field(&self) -> &'static str {
        match self {
            Self::Bluetooth => "btsvc",
            Self::Airplay => "airplaysvc",
            Self::Upnp => "upnpsvc",
        }
    }
}

impl FromStr for RendererService {
    type Err = RendererError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bluetooth" => Ok(Self::Bluetooth),
            "airplay" => Ok(Self::Airplay),
            "upnp" => Ok(Self::Upnp),
            _ => Err(RendererError::InvalidRendererRequest(format!("unknown service '{s}'"))),
        }
    }
}

impl fmt::Display for RendererService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested state for a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererAction {
    On,
    Off,
}

impl FromStr for RendererAction {
    type Err = RendererError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            _ => Err(RendererError::InvalidRendererRequest(format!("unknown action '{s}'"))),
        }
    }
}

/// A validated renderer toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererRequest {
    pub service: RendererService,
    pub action: RendererAction,
}

impl RendererRequest {
    /// Parse service and action names (case-insensitive).
    ///
    /// # Errors
    /// Returns [`RendererError::InvalidRendererRequest`] for unknown names.
    pub fn parse(service: &str, action: &str) -> Result<Self, RendererError> {
        Ok(Self { service: service.parse()?, action: action.parse()? })
    }
}

/// Service units backing each renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererUnits {
    #[serde(default = "default_bluetooth_units")]
    pub bluetooth: Vec<String>,
    #[serde(default = "default_airplay_units")]
    pub airplay: Vec<String>,
    #[serde(default = "default_upnp_units")]
    pub upnp: Vec<String>,
}

impl Default for RendererUnits {
    fn default() -> Self {
        Self {
            bluetooth: default_bluetooth_units(),
            airplay: default_airplay_units(),
            upnp: default_upnp_units(),
        }
    }
}

impl RendererUnits {
    /// Units for a renderer, in start order.
    #[must_use]
    pub fn units(&self, service: RendererService) -> &[String] {
        match service {
            RendererService::Bluetooth => &self.bluetooth,
            RendererService::Airplay => &self.airplay,
            RendererService::Upnp => &self.upnp,
        }
    }
}

fn default_bluetooth_units() -> Vec<String> {
    vec!["bluetooth".to_string(), "bluealsa".to_string()]
}

fn default_airplay_units() -> Vec<String> {
    vec!["shairport-sync".to_string()]
}

fn default_upnp_units() -> Vec<String> {
    vec!["upmpdcli".to_string()]
}

/// Result of a renderer toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererOutcome {
    pub service: RendererService,
    pub enabled: bool,
}

/// Recorded on/off state of every renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RendererFlags {
    pub bluetooth: bool,
    pub airplay: bool,
    pub upnp: bool,
}

impl RendererFlags {
    /// Flag for one renderer.
    #[must_use]
    pub fn get(&self, service: RendererService) -> bool {
        match service {
            RendererService::Bluetooth => self.bluetooth,
            RendererService::Airplay => self.airplay,
            RendererService::Upnp => self.upnp,
        }
    }

    fn set(&mut self, service: RendererService, on: bool) {
        match service {
            RendererService::Bluetooth => self.bluetooth = on,
            RendererService::Airplay => self.airplay = on,
            RendererService::Upnp => self.upnp = on,
        }
    }
}

/// Starts and stops renderer services and records their flags.
pub struct RendererController<M> {
    manager: M,
    units: RendererUnits,
}

impl<M: ServiceManager> RendererController<M> {
    /// Create a controller with the given unit mapping.
    #[must_use]
    pub fn new(manager: M, units: RendererUnits) -> Self {
        Self { manager, units }
    }

    /// Validate names, then toggle.
    ///
    /// # Errors
    /// Unknown names fail with [`RendererError::InvalidRendererRequest`]
    /// before any service is touched. See [`Self::toggle`] otherwise.
    pub fn toggle_named(
        &self,
        session: &mut dyn Session,
        service: &str,
        action: &str,
    ) -> Result<RendererOutcome, RendererError> {
        let request = RendererRequest::parse(service, action)?;
        self.toggle(session, request)
    }

    /// Start or stop a renderer and record its flag.
    ///
    /// There is no check of the current flag; the service manager's start
    /// and stop are idempotent. The flag is only written once every unit
    /// command succeeded.
    ///
    /// # Errors
    /// Returns an error if a unit fails to start or stop, or the session
    /// cannot be written.
    pub fn toggle(
        &self,
        session: &mut dyn Session,
        request: RendererRequest,
    ) -> Result<RendererOutcome, RendererError> {
        let RendererRequest { service, action } = request;
        let units = self.units.units(service);

        let enabled = match action {
            RendererAction::On => {
                for unit in units {
                    debug!(%service, unit = %unit, "Starting unit");
                    self.manager
                        .start(unit)
                        .map_err(|source| RendererError::ServiceStartFailed { service, source })?;
                }
                true
            }
            RendererAction::Off => {
                for unit in units.iter().rev() {
                    debug!(%service, unit = %unit, "Stopping unit");
                    self.manager
                        .stop(unit)
                        .map_err(|source| RendererError::ServiceStopFailed { service, source })?;
                }
                false
            }
        };

        session.write_field(service.flag_field(), if enabled { "1" } else { "0" })?;
        info!(%service, enabled, "Renderer toggled");

        Ok(RendererOutcome { service, enabled })
    }

    /// Read the recorded flags of all renderers.
    ///
    /// # Errors
    /// Returns an error if the session cannot be read.
    pub fn status(&self, session: &dyn Session) -> Result<RendererFlags, RendererError> {
        let mut flags = RendererFlags::default();
        for service in RendererService::ALL {
            let value = session.read_field(service.flag_field())?;
            flags.set(service, value.as_deref() == Some("1"));
        }
        Ok(flags)
    }
}
