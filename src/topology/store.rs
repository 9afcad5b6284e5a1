/*!
Read access to the externally maintained topology graph.

This module defines:
- `TopologyStore`: the read-only interface the resolver consumes. Every read hands back an
  owned snapshot; nothing is ever written through it.
- `MemoryStore`: an in-memory store holding whole topologies, loadable from JSON.
*/

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    network::{
        address::IpAddress,
        node::{BridgeAugmentation, Node, Topology},
    },
    topology::path::{BridgeKey, NodeKey, TopologyKey},
};

/// Synchronous, read-only view of the topology store.
///
/// Implementations may block; the resolver treats each call as an independent snapshot
/// and never assumes two reads observe the same state.
pub trait TopologyStore {
    fn read_topology(&self, key: &TopologyKey) -> Option<Topology>;

    fn read_node(&self, key: &NodeKey) -> Option<Node>;

    fn read_bridge(&self, key: &BridgeKey) -> Option<BridgeAugmentation> {
        self.read_node(key.node()).and_then(|node| node.bridge)
    }

    /// Node of `topology` whose management connection points at `address`.
    /// The default scans a fresh topology snapshot.
    fn find_node_by_management_address(
        &self,
        topology: &TopologyKey,
        address: &IpAddress,
    ) -> Option<Node> {
        self.read_topology(topology)?
            .nodes
            .into_iter()
            .find(|node| node.management_address().as_ref() == Some(address))
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Could not read topology snapshot {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("Could not parse topology snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Topologies held in memory, e.g. a snapshot dumped from the operational datastore.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    topologies: Vec<Topology>,
}

impl MemoryStore {
    pub fn new(topologies: Vec<Topology>) -> Self {
        Self { topologies }
    }

    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        let json = fs::read_to_string(path)
            .map_err(|e| StoreError::Io(path.display().to_string(), e))?;
        Self::from_json_str(&json)
    }

    /// Replaces the topology with the same id, or adds it.
    pub fn replace_topology(&mut self, topology: Topology) {
        match self
            .topologies
            .iter_mut()
            .find(|t| t.topology_id == topology.topology_id)
        {
            Some(existing) => *existing = topology,
            None => self.topologies.push(topology),
        }
    }

    fn topology(&self, key: &TopologyKey) -> Option<&Topology> {
        self.topologies
            .iter()
            .find(|t| t.topology_id == key.topology_id())
    }
}

impl TopologyStore for MemoryStore {
    fn read_topology(&self, key: &TopologyKey) -> Option<Topology> {
        self.topology(key).cloned()
    }

    fn read_node(&self, key: &NodeKey) -> Option<Node> {
        self.topology(key.topology())?
            .nodes
            .iter()
            .find(|node| &node.node_id == key.node_id())
            .cloned()
    }

    fn find_node_by_management_address(
        &self,
        topology: &TopologyKey,
        address: &IpAddress,
    ) -> Option<Node> {
        self.topology(topology)?
            .nodes
            .iter()
            .find(|node| node.management_address().as_ref() == Some(address))
            .cloned()
    }
}
