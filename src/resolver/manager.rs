//! Management connection lookups.

use crate::{
    error::{ResolveError, ResolveResult},
    network::{
        address::IpAddress,
        forwarder::Forwarder,
        node::{BridgeAugmentation, ManagerAugmentation, Node},
    },
    resolver::Resolver,
    topology::{
        path::{InstancePath, NodeRef, PathTarget},
        store::TopologyStore,
    },
};

/// Management address of `forwarder`: the address of its LAST IP based data plane
/// locator. Earlier IP locators are overwritten, not preferred.
pub fn address_of_forwarder(forwarder: &Forwarder) -> Option<IpAddress> {
    forwarder.ip_locators().last().map(|locator| locator.ip)
}

impl<S: TopologyStore + ?Sized> Resolver<'_, S> {
    /// Node whose management connection comes from `address`.
    pub fn by_ip(&self, address: &IpAddress) -> Option<Node> {
        let node = self
            .store
            .find_node_by_management_address(&self.topology, address);
        if node.is_none() {
            tracing::warn!("OVS node for IP address {} does not exist", address);
        }
        node
    }

    /// Management attributes of the node `node_ref` points at.
    ///
    /// Only node references are meaningful here; anything else is a caller error.
    pub fn by_reference(&self, node_ref: &NodeRef) -> ResolveResult<Option<ManagerAugmentation>> {
        let key = match node_ref.path() {
            InstancePath::Node(key) => key,
            _ => {
                tracing::warn!("Reference {} does not point at an OVSDB node", node_ref);
                return Err(ResolveError::WrongReferenceType {
                    expected: PathTarget::Node,
                    found: node_ref.target(),
                });
            }
        };

        match self.store.read_node(key) {
            Some(node) => Ok(node.manager),
            None => {
                tracing::warn!("Could not find OVSDB node for connection {}", node_ref);
                Ok(None)
            }
        }
    }

    /// Management attributes of the node managing `bridge`.
    pub fn managing_node_info(&self, bridge: &BridgeAugmentation) -> Option<ManagerAugmentation> {
        self.resolve_managing_node(bridge)?.manager
    }

    /// Management node of `forwarder`, found through its locator address.
    pub fn lookup_topology_node(&self, forwarder: &Forwarder) -> Option<Node> {
        let Some(address) = address_of_forwarder(forwarder) else {
            tracing::debug!("Could not get IP address for forwarder {}", forwarder.name);
            return None;
        };
        self.by_ip(&address)
    }
}
