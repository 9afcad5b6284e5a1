/*!
Port classification and OpenFlow port lookups.

A flow-based VXLAN port carries `remote_ip=flow`. The GPE flavour additionally carries
`exts=gpe`; both options must be present as two distinct entries, so a port that repeats
`remote_ip=flow` is still a plain tunnel. DPDK ports only exist on netdev bridges.
*/

use std::collections::HashSet;

use crate::{
    network::{
        datapath,
        node::{BridgeAugmentation, DatapathType, InterfaceType, PortAugmentation, PortOption, TerminationPoint},
        options::{OPTION_EXTS, OPTION_REMOTE_IP, VALUE_FLOW, VALUE_GPE},
    },
    resolver::Resolver,
    topology::store::TopologyStore,
};

/// Encapsulation category of a termination point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortClass {
    PlainTunnel,
    TunnelWithExtension,
    AcceleratedPort,
    Unclassified,
}

pub fn is_flow_based(option: &PortOption) -> bool {
    option.is(OPTION_REMOTE_IP, VALUE_FLOW)
}

pub fn is_extension(option: &PortOption) -> bool {
    option.is(OPTION_EXTS, VALUE_GPE)
}

pub fn matches_plain_tunnel(port: &PortAugmentation) -> bool {
    port.interface_type == InterfaceType::Tunnel && port.options.iter().any(is_flow_based)
}

pub fn matches_extended_tunnel(port: &PortAugmentation) -> bool {
    if port.interface_type != InterfaceType::Tunnel {
        return false;
    }
    let distinct: HashSet<&PortOption> = port
        .options
        .iter()
        .filter(|o| is_flow_based(o) || is_extension(o))
        .collect();
    distinct.len() == 2
}

pub fn matches_accelerated_port(bridge: &BridgeAugmentation, tp: &TerminationPoint, port_name: &str) -> bool {
    bridge.datapath_type == DatapathType::AcceleratedUserspace
        && tp.tp_id.as_str() == port_name
        && tp
            .port
            .as_ref()
            .is_some_and(|p| p.interface_type == InterfaceType::AcceleratedPort)
}

/// Most specific class of `tp`. An extended tunnel also satisfies the plain tunnel
/// predicate; it is reported as `TunnelWithExtension`.
pub fn classify(bridge: &BridgeAugmentation, tp: &TerminationPoint, accelerated_port_name: &str) -> PortClass {
    if matches_accelerated_port(bridge, tp, accelerated_port_name) {
        return PortClass::AcceleratedPort;
    }
    match &tp.port {
        Some(port) if matches_extended_tunnel(port) => PortClass::TunnelWithExtension,
        Some(port) if matches_plain_tunnel(port) => PortClass::PlainTunnel,
        _ => PortClass::Unclassified,
    }
}

impl<S: TopologyStore + ?Sized> Resolver<'_, S> {
    /// OpenFlow port of the first termination point on switch `switch_node_id` that
    /// satisfies `predicate` and already has a port number.
    ///
    /// Nodes and ports are visited in store order. When several ports match, which one
    /// is returned is unspecified.
    pub fn find_port<P>(&self, switch_node_id: &str, predicate: P) -> Option<u32>
    where
        P: Fn(&BridgeAugmentation, &TerminationPoint) -> bool,
    {
        if switch_node_id.is_empty() {
            return None;
        }
        let topology = self.snapshot()?;

        for node in &topology.nodes {
            let Some(bridge) = &node.bridge else {
                continue;
            };
            let Some(dpid) = &bridge.datapath_id else {
                tracing::debug!("Bridge node {} has no datapath id yet", node.node_id);
                continue;
            };
            let of_node_id = match datapath::to_node_id(dpid) {
                Ok(id) => id,
                Err(e) => {
                    tracing::debug!("Skipping bridge node {}: {}", node.node_id, e);
                    continue;
                }
            };
            if of_node_id != switch_node_id {
                continue;
            }

            let found = node
                .termination_points
                .iter()
                .filter(|tp| predicate(bridge, *tp))
                .find_map(TerminationPoint::ofport);
            if found.is_some() {
                return found;
            }
        }
        None
    }

    pub fn find_port_by_name(&self, switch_node_id: &str, port_name: &str) -> Option<u32> {
        self.find_port(switch_node_id, |_, tp| tp.tp_id.as_str() == port_name)
    }

    /// Flow-based VXLAN port.
    pub fn tunnel_port(&self, switch_node_id: &str) -> Option<u32> {
        self.find_port(switch_node_id, |_, tp| {
            tp.port.as_ref().is_some_and(matches_plain_tunnel)
        })
    }

    /// Flow-based VXLAN-GPE port.
    pub fn extended_tunnel_port(&self, switch_node_id: &str) -> Option<u32> {
        self.find_port(switch_node_id, |_, tp| {
            tp.port.as_ref().is_some_and(matches_extended_tunnel)
        })
    }

    /// DPDK port `port_name`, or the configured default DPDK port name.
    pub fn accelerated_port(&self, switch_node_id: &str, port_name: Option<&str>) -> Option<u32> {
        let port_name = port_name.unwrap_or(self.default_accelerated_port.as_str());
        self.find_port(switch_node_id, |bridge, tp| {
            matches_accelerated_port(bridge, tp, port_name)
        })
    }
}
