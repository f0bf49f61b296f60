//! Toolkit-free core of the desktop app shell.
//!
//! The Tauri shell in `src-tauri` wires these pieces into the window host: the `app://` and
//! `storage://` scheme resolvers, the bounded initial-load retry chain, the capability registry
//! behind `window.api`, and the route table handed to the front-end router.

pub mod asset_protocol;
pub mod capability_bridge;
pub mod file_protocol;
pub mod load_retry;
pub mod mime_table;
pub mod route_table;
pub mod shell_config;

pub use asset_protocol::{
    AssetError, AssetResolver, AssetResponse, BufferedAsset, ResourceRequest, UnknownMimePolicy,
    DEFAULT_DOCUMENT,
};
pub use capability_bridge::{
    BridgeError, CapabilityHandler, CapabilityRegistry, DEFAULT_BRIDGE_NAMESPACE,
};
pub use file_protocol::{resolve_storage_path, serve_storage, strip_scheme};
pub use load_retry::{
    spawn_load_retry, CancelFlag, LoadOutcome, LoadRetryController, Navigator, RetryPolicy,
    RetryState, Sleeper, ThreadSleeper,
};
pub use route_table::{
    assemble, discover_route_contributions, RouteContribution, RouteDescriptor, RouteOrder,
    RouteTable,
};
pub use shell_config::{packaged_entry_url, ShellConfig, APP_SCHEME, STORAGE_SCHEME};
