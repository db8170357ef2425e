//! Group Module
//!
//! Read-through orchestration on top of the local cache and the peer layer.
//!
//! ## Lookup Flow
//! 1. **Local**: The group's `CacheShard` is checked first.
//! 2. **Remote**: On a miss, the registered `PeerPicker` names the owner; if it is another node,
//!    its `PeerFetcher` is asked for the bytes.
//! 3. **Fallback**: If this node owns the key, or the remote fetch fails, the group's getter
//!    loads the value and the result is cached locally.
//!
//! Concurrent misses for the same key are not coalesced; each caller loads independently.
//!
//! ## Submodules
//! - **`group`**: The `Group` type and its lookup logic.
//! - **`registry`**: `GroupRegistry`, the explicit name → group map shared with the server.

#[allow(clippy::module_inception)]
pub mod group;
pub mod registry;

pub use group::{GetterFn, Group, GroupStats};
pub use registry::GroupRegistry;
