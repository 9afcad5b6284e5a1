/*!
Resolution of forwarders onto the OVSDB topology.

`Resolver` borrows a `TopologyStore` and carries the immutable configuration; it holds no
mutable state, so one resolver can be shared by any number of threads as long as the store
itself is `Sync`. The operations are split by concern:
- `ports`: option-set classification of termination points and port number lookups.
- `bridge`: managing node of a bridge and bridge node id composition.
- `manager`: management connection lookups by address or reference.
- `forwarder`: the top-level forwarder -> switch resolution.

Resolution misses are `None` and are logged where the chain broke.
*/

pub mod bridge;
pub mod forwarder;
pub mod manager;
pub mod ports;

use crate::{
    config::ResolverConfig,
    error::ResolveResult,
    network::{node::Topology, options::DEFAULT_ACCELERATED_PORT},
    topology::{
        path::{TopologyKey, ovsdb_topology_key, topology_key},
        store::TopologyStore,
    },
};

pub struct Resolver<'a, S: TopologyStore + ?Sized> {
    store: &'a S,
    topology: TopologyKey,
    default_accelerated_port: String,
}

impl<'a, S: TopologyStore + ?Sized> Resolver<'a, S> {
    /// Resolver over the OVSDB topology with default settings.
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            topology: ovsdb_topology_key(),
            default_accelerated_port: DEFAULT_ACCELERATED_PORT.to_string(),
        }
    }

    pub fn with_config(store: &'a S, config: &ResolverConfig) -> ResolveResult<Self> {
        Ok(Self {
            store,
            topology: topology_key(&config.topology_id)?,
            default_accelerated_port: config.default_accelerated_port.clone(),
        })
    }

    pub fn store(&self) -> &S {
        self.store
    }

    pub fn topology(&self) -> &TopologyKey {
        &self.topology
    }

    fn snapshot(&self) -> Option<Topology> {
        let topology = self.store.read_topology(&self.topology);
        if topology.is_none() {
            tracing::debug!("Topology {} is not available", self.topology.topology_id());
        }
        topology
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ResolveError, topology::store::MemoryStore};

    #[test]
    fn test_config_selects_topology() {
        let store = MemoryStore::default();
        let config = ResolverConfig {
            topology_id: "ovsdb:2".to_string(),
            default_accelerated_port: "dpdk3".to_string(),
        };
        let resolver = Resolver::with_config(&store, &config).unwrap();
        assert_eq!(resolver.topology().topology_id(), "ovsdb:2");
        assert_eq!(resolver.default_accelerated_port, "dpdk3");
        assert!(resolver.snapshot().is_none());
    }

    #[test]
    fn test_empty_topology_id_is_rejected() {
        let store = MemoryStore::default();
        let config = ResolverConfig {
            topology_id: String::new(),
            ..ResolverConfig::default()
        };
        assert!(matches!(
            Resolver::with_config(&store, &config),
            Err(ResolveError::InvalidKey(_))
        ));
    }
}
