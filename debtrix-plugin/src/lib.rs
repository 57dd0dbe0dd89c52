//! Design-tool plugin host for Debtrix.
//!
//! The plugin runs in two halves: a sandboxed host with storage and
//! network privileges, and an iframe UI with neither. Every capability
//! the UI needs travels over the typed message bridge ([`protocol`]),
//! is executed by the host ([`host`]) against the backend's REST
//! surface ([`rest`]), and comes back as a mirrored reply the UI folds
//! into its disposable rendering cache ([`bridge`]).

pub mod bridge;
pub mod context;
mod env;
mod error;
pub mod host;
pub mod protocol;
mod rest;
mod session;

pub use bridge::{BridgeState, RequestKind, RequestPhase, UiModel};
pub use context::derive_design_context;
pub use env::{DocumentSnapshot, HostEnv, MemoryEnv, NodeRef};
pub use error::{PluginError, PluginResult};
pub use host::{PluginHost, KEY_API_KEY, KEY_CONFIG};
pub use protocol::{DesignContext, Envelope, HostReply, UiRequest};
pub use rest::RestClient;
pub use session::{PluginConfig, PluginSession};
