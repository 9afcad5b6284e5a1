/*!
Bridge nodes and their managers.

A bridge node id is always `<managing node id>/bridge/<bridge name>`. The resolver rebuilds
it from a forwarder's bridge name and the node of its management connection rather than
trusting any cached id.
*/

use crate::{
    error::{ResolveError, ResolveResult},
    network::{
        forwarder::Forwarder,
        node::{BridgeAugmentation, Node, NodeId},
        options::BRIDGE_SEPARATOR,
    },
    resolver::Resolver,
    topology::{
        path::{NodeKey, NodeRef, PortKey, TerminationPointKey, node_key, port_key, termination_point_key},
        store::TopologyStore,
    },
};

/// Node id of `bridge`, composed from its manager's node id and its name.
pub fn bridge_node_id(bridge: &BridgeAugmentation) -> ResolveResult<NodeId> {
    let bridge_name = bridge
        .bridge_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ResolveError::MissingBridgeIdentity("bridge name is not set".to_string()))?;
    let managed_by = bridge.managed_by.as_ref().ok_or_else(|| {
        ResolveError::MissingBridgeIdentity(format!("bridge {} has no managed-by reference", bridge_name))
    })?;
    let manager = managed_by.node_key().ok_or_else(|| {
        ResolveError::MissingBridgeIdentity(format!(
            "managed-by reference {} of bridge {} names no node",
            managed_by, bridge_name
        ))
    })?;

    Ok(NodeId::new(format!(
        "{}{}{}",
        manager.node_id(),
        BRIDGE_SEPARATOR,
        bridge_name
    )))
}

/// Store key of the bridge's own node, in the topology of its manager.
pub fn bridge_node_key(bridge: &BridgeAugmentation) -> ResolveResult<NodeKey> {
    let node_id = bridge_node_id(bridge)?;
    let topology = bridge
        .managed_by
        .as_ref()
        .and_then(NodeRef::node_key)
        .map(NodeKey::topology)
        .ok_or_else(|| ResolveError::MissingBridgeIdentity(node_id.to_string()))?;
    node_key(topology, node_id.as_str())
}

/// Key of the port augmentation of `port_name` on `bridge`.
pub fn port_key_for(bridge: &BridgeAugmentation, port_name: &str) -> ResolveResult<PortKey> {
    let node = bridge_node_key(bridge)?;
    Ok(port_key(&termination_point_key(&node, port_name)?))
}

impl<S: TopologyStore + ?Sized> Resolver<'_, S> {
    /// Node managing `bridge`. Bridges are often seen before their manager is, so a
    /// missing reference or node is an ordinary miss.
    pub fn resolve_managing_node(&self, bridge: &BridgeAugmentation) -> Option<Node> {
        let name = bridge.bridge_name.as_deref().unwrap_or("<unnamed>");
        let Some(managed_by) = &bridge.managed_by else {
            tracing::warn!("OVS bridge [{}] has no managed-by entry", name);
            return None;
        };
        let Some(key) = managed_by.node_key() else {
            tracing::warn!("OVS bridge [{}] is managed by {}, which is not a node", name, managed_by);
            return None;
        };
        let node = self.store.read_node(key);
        if node.is_none() {
            tracing::warn!("OVS bridge [{}] managed-by node {} does not exist", name, key.node_id());
        }
        node
    }

    /// Termination point of a forwarder's data plane locator on its bridge node.
    pub fn locator_termination_point_key(
        &self,
        bridge_node_id: &NodeId,
        locator_name: &str,
    ) -> ResolveResult<TerminationPointKey> {
        let node = node_key(&self.topology, bridge_node_id.as_str())?;
        termination_point_key(&node, locator_name)
    }

    /// Bridge node id of the bridge `forwarder` is attached to, rebuilt from the node of
    /// the forwarder's management connection and its recorded bridge name.
    pub fn resolve_forwarder_bridge_node_id(&self, forwarder: &Forwarder) -> Option<NodeId> {
        let Some(manager) = self.lookup_topology_node(forwarder) else {
            tracing::warn!("No topology node for forwarder {}", forwarder.name);
            return None;
        };
        let Some(bridge_name) = forwarder.bridge.as_ref().and_then(|b| b.bridge_name.clone()) else {
            tracing::warn!("No OVS bridge for forwarder {}", forwarder.name);
            return None;
        };

        let manager_key = match node_key(&self.topology, manager.node_id.as_str()) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!("Manager of forwarder {} is unusable: {}", forwarder.name, e);
                return None;
            }
        };
        let bridge = BridgeAugmentation {
            bridge_name: Some(bridge_name),
            managed_by: Some(NodeRef::new(manager_key)),
            ..BridgeAugmentation::default()
        };

        match bridge_node_id(&bridge) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("No bridge node id for forwarder {}: {}", forwarder.name, e);
                None
            }
        }
    }
}
