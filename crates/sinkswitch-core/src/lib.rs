//! Sinkswitch Core - output switching state machine and renderer control.
//!
//! This crate holds the domain types and the two controllers. Everything
//! that touches the system (Bluetooth tooling, config files, the service
//! manager, the session database) is reached through the traits in
//! [`capability`] and [`session`].

pub mod capability;
pub mod device;
pub mod discovery;
pub mod error;
pub mod output;
pub mod renderer;
pub mod session;
pub mod switch;

pub use capability::{BluetoothAdapter, ServiceManager, SinkConfigWriter};
pub use device::{BluetoothDevice, MacAddress};
pub use error::{DeviceError, DeviceResult, RendererError, StoreError, StoreResult, SwitchError};
pub use output::{OutputTarget, SwitchOutcome};
pub use renderer::{
    RendererAction, RendererController, RendererFlags, RendererOutcome, RendererRequest,
    RendererService, RendererUnits,
};
pub use session::{MemorySession, MemoryStore, Session};
pub use switch::OutputSwitchController;
