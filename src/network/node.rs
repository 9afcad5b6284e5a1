use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{network::address::IpAddress, topology::path::NodeRef};

/// Identifier of a vertex in the topology graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a termination point (port) within its node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TpId(String);

impl TpId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Root graph container as read from the topology store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topology {
    pub topology_id: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// A vertex of the topology graph. A node is a bridge, a management connection endpoint,
/// both, or neither, depending on which augmentations it carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub node_id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge: Option<BridgeAugmentation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<ManagerAugmentation>,
    #[serde(default)]
    pub termination_points: Vec<TerminationPoint>,
}

impl Node {
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            bridge: None,
            manager: None,
            termination_points: Vec::new(),
        }
    }

    pub fn with_bridge(mut self, bridge: BridgeAugmentation) -> Self {
        self.bridge = Some(bridge);
        self
    }

    pub fn with_manager(mut self, manager: ManagerAugmentation) -> Self {
        self.manager = Some(manager);
        self
    }

    pub fn with_termination_point(mut self, tp: TerminationPoint) -> Self {
        self.termination_points.push(tp);
        self
    }

    /// Remote address of the management connection, if this node is a manager endpoint.
    pub fn management_address(&self) -> Option<IpAddress> {
        self.manager
            .as_ref()
            .and_then(|m| m.connection_info.as_ref())
            .map(|c| c.remote_ip)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatapathType {
    #[default]
    #[serde(rename = "system")]
    Standard,
    /// Userspace (netdev) datapath, required for DPDK ports.
    #[serde(rename = "netdev")]
    AcceleratedUserspace,
}

/// Bridge attributes of a node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeAugmentation {
    pub bridge_name: Option<String>,
    /// Colon separated hex form, see `network::datapath`.
    pub datapath_id: Option<String>,
    #[serde(default)]
    pub datapath_type: DatapathType,
    /// Path of the node managing this bridge. A reference resolved by lookup, never owned.
    pub managed_by: Option<NodeRef>,
}

/// Management connection attributes of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagerAugmentation {
    pub connection_info: Option<ConnectionInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ovs_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub remote_ip: IpAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_ip: Option<IpAddress>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminationPoint {
    pub tp_id: TpId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<PortAugmentation>,
}

impl TerminationPoint {
    pub fn new(tp_id: TpId, port: Option<PortAugmentation>) -> Self {
        Self { tp_id, port }
    }

    /// OpenFlow port number, once the southbound layer has assigned one.
    pub fn ofport(&self) -> Option<u32> {
        self.port.as_ref().and_then(|p| p.ofport)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterfaceType {
    #[serde(rename = "vxlan")]
    Tunnel,
    #[serde(rename = "vxlan-gpe")]
    TunnelExtended,
    #[serde(rename = "dpdk")]
    AcceleratedPort,
    #[default]
    #[serde(rename = "other")]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortAugmentation {
    #[serde(default)]
    pub interface_type: InterfaceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ofport: Option<u32>,
    /// Free-form interface options. Keys may repeat and carry no ordering.
    #[serde(default)]
    pub options: Vec<PortOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortOption {
    pub option: String,
    pub value: String,
}

impl PortOption {
    pub fn new(option: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            option: option.into(),
            value: value.into(),
        }
    }

    pub fn is(&self, option: &str, value: &str) -> bool {
        self.option == option && self.value == value
    }
}
