//! Economics Lab Shell
//!
//! Connects the formula core to live chain data:
//! - Lab configuration (`econ-lab.toml`)
//! - JSON-RPC client for the node API
//! - Snapshot sources (RPC or fixed mock baseline)
//! - Explicit lab context with scenario, preset and pin state
//! - Debounced recomputation and background polling

pub mod config;
pub mod context;
pub mod debounce;
pub mod rpc;
pub mod session;
pub mod source;

pub use config::{ConfigError, LabConfig};
pub use context::{InputEdit, LabContext, LabReport};
pub use debounce::Debouncer;
pub use rpc::{ClientError, RpcClient};
pub use session::{LabSession, SharedContext};
pub use source::{LiveData, RpcSnapshotSource, SnapshotSource, StaticSource};
