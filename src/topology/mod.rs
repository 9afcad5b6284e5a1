/*!
Topology module

This module defines how the resolver reaches the operational topology.

Structure:
- `path`: Typed instance paths (topology, node, bridge, termination point, port) and
          their textual form.
- `store`: A read-only `TopologyStore` trait keyed by those paths, plus the in-memory
           `MemoryStore` loaded from JSON snapshots.

Re-exports:
- `TopologyStore`, `MemoryStore` and `StoreError` for easy consumption by callers.
*/

pub mod path;
pub mod store;

pub use store::{MemoryStore, StoreError, TopologyStore};
