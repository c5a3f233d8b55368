//! Sinkswitch Device - system backends for the core capabilities.
//!
//! Bluetooth control goes through the player's `blu-control` script,
//! services through `systemctl`, and the Bluetooth stream binding through
//! its ALSA config file.

pub mod blu_control;
pub mod command;
pub mod stream_config;
pub mod systemctl;

pub use blu_control::BluControl;
pub use command::CommandLine;
pub use stream_config::BtStreamConfig;
pub use systemctl::Systemctl;
