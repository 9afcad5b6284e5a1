/*!
Hierarchical keys addressing the topology store.

Keys nest topology -> node -> {bridge augmentation, termination point -> port augmentation}.
Every builder rejects empty identifier components; nothing else is validated.

`InstancePath` is the type-erased form used wherever the graph refers back to itself
(e.g. a bridge's `managed_by`). Its text form looks like
`/network-topology/topology[ovsdb:1]/node[ovsdb://uuid/1234]/termination-point[vxlan0]/port`.
*/

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{ResolveError, ResolveResult},
    network::{
        node::{NodeId, TpId},
        options::OVSDB_TOPOLOGY_ID,
    },
};

const ROOT: &str = "/network-topology/topology[";
const NODE_SEGMENT: &str = "/node[";
const BRIDGE_SUFFIX: &str = "]/bridge";
const TP_SEGMENT: &str = "]/termination-point[";
const PORT_SUFFIX: &str = "/port";

/// What an `InstancePath` points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathTarget {
    Topology,
    Node,
    Bridge,
    TerminationPoint,
    Port,
}

impl Display for PathTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PathTarget::Topology => "topology",
            PathTarget::Node => "node",
            PathTarget::Bridge => "bridge",
            PathTarget::TerminationPoint => "termination-point",
            PathTarget::Port => "port",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopologyKey {
    topology_id: String,
}

impl TopologyKey {
    pub fn topology_id(&self) -> &str {
        &self.topology_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey {
    topology: TopologyKey,
    node_id: NodeId,
}

impl NodeKey {
    pub fn topology(&self) -> &TopologyKey {
        &self.topology
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }
}

/// Bridge augmentation of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BridgeKey {
    node: NodeKey,
}

impl BridgeKey {
    pub fn node(&self) -> &NodeKey {
        &self.node
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TerminationPointKey {
    node: NodeKey,
    tp_id: TpId,
}

impl TerminationPointKey {
    pub fn node(&self) -> &NodeKey {
        &self.node
    }

    pub fn tp_id(&self) -> &TpId {
        &self.tp_id
    }
}

/// Port augmentation of a termination point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortKey {
    termination_point: TerminationPointKey,
}

impl PortKey {
    pub fn termination_point(&self) -> &TerminationPointKey {
        &self.termination_point
    }
}

/// The fixed OVSDB topology.
pub fn ovsdb_topology_key() -> TopologyKey {
    TopologyKey {
        topology_id: OVSDB_TOPOLOGY_ID.to_string(),
    }
}

pub fn topology_key(topology_id: &str) -> ResolveResult<TopologyKey> {
    require("topology id", topology_id)?;
    Ok(TopologyKey {
        topology_id: topology_id.to_string(),
    })
}

pub fn node_key(topology: &TopologyKey, node_id: &str) -> ResolveResult<NodeKey> {
    require("node id", node_id)?;
    Ok(NodeKey {
        topology: topology.clone(),
        node_id: NodeId::new(node_id),
    })
}

pub fn bridge_key(node: &NodeKey) -> BridgeKey {
    BridgeKey { node: node.clone() }
}

pub fn termination_point_key(node: &NodeKey, tp_id: &str) -> ResolveResult<TerminationPointKey> {
    require("termination point id", tp_id)?;
    Ok(TerminationPointKey {
        node: node.clone(),
        tp_id: TpId::new(tp_id),
    })
}

pub fn port_key(termination_point: &TerminationPointKey) -> PortKey {
    PortKey {
        termination_point: termination_point.clone(),
    }
}

fn require(what: &str, value: &str) -> ResolveResult<()> {
    if value.is_empty() {
        Err(ResolveError::InvalidKey(format!("empty {}", what)))
    } else {
        Ok(())
    }
}

impl Display for TopologyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}]", ROOT, self.topology_id)
    }
}

impl Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}]", self.topology, NODE_SEGMENT, self.node_id)
    }
}

impl Display for BridgeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/bridge", self.node)
    }
}

impl Display for TerminationPointKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/termination-point[{}]", self.node, self.tp_id)
    }
}

impl Display for PortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.termination_point, PORT_SUFFIX)
    }
}

/// Any key of the store, used for references between graph elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InstancePath {
    Topology(TopologyKey),
    Node(NodeKey),
    Bridge(BridgeKey),
    TerminationPoint(TerminationPointKey),
    Port(PortKey),
}

impl InstancePath {
    pub fn target(&self) -> PathTarget {
        match self {
            InstancePath::Topology(_) => PathTarget::Topology,
            InstancePath::Node(_) => PathTarget::Node,
            InstancePath::Bridge(_) => PathTarget::Bridge,
            InstancePath::TerminationPoint(_) => PathTarget::TerminationPoint,
            InstancePath::Port(_) => PathTarget::Port,
        }
    }

    /// The node this path lives under, for anything below the topology.
    pub fn node_key(&self) -> Option<&NodeKey> {
        match self {
            InstancePath::Topology(_) => None,
            InstancePath::Node(key) => Some(key),
            InstancePath::Bridge(key) => Some(key.node()),
            InstancePath::TerminationPoint(key) => Some(key.node()),
            InstancePath::Port(key) => Some(key.termination_point().node()),
        }
    }
}

impl From<TopologyKey> for InstancePath {
    fn from(key: TopologyKey) -> Self {
        InstancePath::Topology(key)
    }
}

impl From<NodeKey> for InstancePath {
    fn from(key: NodeKey) -> Self {
        InstancePath::Node(key)
    }
}

impl From<BridgeKey> for InstancePath {
    fn from(key: BridgeKey) -> Self {
        InstancePath::Bridge(key)
    }
}

impl From<TerminationPointKey> for InstancePath {
    fn from(key: TerminationPointKey) -> Self {
        InstancePath::TerminationPoint(key)
    }
}

impl From<PortKey> for InstancePath {
    fn from(key: PortKey) -> Self {
        InstancePath::Port(key)
    }
}

impl Display for InstancePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstancePath::Topology(key) => write!(f, "{}", key),
            InstancePath::Node(key) => write!(f, "{}", key),
            InstancePath::Bridge(key) => write!(f, "{}", key),
            InstancePath::TerminationPoint(key) => write!(f, "{}", key),
            InstancePath::Port(key) => write!(f, "{}", key),
        }
    }
}

impl FromStr for InstancePath {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ResolveError::InvalidKey(format!("unrecognised path {}", s));

        let rest = s.strip_prefix(ROOT).ok_or_else(invalid)?;
        let (topology_id, rest) = rest.split_once(']').ok_or_else(invalid)?;
        let topology = topology_key(topology_id)?;
        if rest.is_empty() {
            return Ok(InstancePath::Topology(topology));
        }

        let rest = rest.strip_prefix(NODE_SEGMENT).ok_or_else(invalid)?;
        if let Some(node_id) = rest.strip_suffix(BRIDGE_SUFFIX) {
            return Ok(InstancePath::Bridge(bridge_key(&node_key(&topology, node_id)?)));
        }

        let (rest, is_port) = match rest.strip_suffix(PORT_SUFFIX) {
            Some(rest) => (rest, true),
            None => (rest, false),
        };

        // Node ids may contain '/', so split on the last termination point marker
        if let Some(idx) = rest.rfind(TP_SEGMENT) {
            let node = node_key(&topology, &rest[..idx])?;
            let tp_id = rest[idx + TP_SEGMENT.len()..]
                .strip_suffix(']')
                .ok_or_else(invalid)?;
            let tp = termination_point_key(&node, tp_id)?;
            return Ok(if is_port {
                InstancePath::Port(port_key(&tp))
            } else {
                InstancePath::TerminationPoint(tp)
            });
        }

        if is_port {
            return Err(invalid());
        }
        let node_id = rest.strip_suffix(']').ok_or_else(invalid)?;
        Ok(InstancePath::Node(node_key(&topology, node_id)?))
    }
}

impl Serialize for InstancePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for InstancePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Opaque reference to a graph element, e.g. the manager of a bridge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeRef(InstancePath);

impl NodeRef {
    pub fn new(path: impl Into<InstancePath>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &InstancePath {
        &self.0
    }

    pub fn target(&self) -> PathTarget {
        self.0.target()
    }

    pub fn node_key(&self) -> Option<&NodeKey> {
        self.0.node_key()
    }
}

impl Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> NodeKey {
        node_key(&ovsdb_topology_key(), id).unwrap()
    }

    #[test]
    fn test_keys_nest() {
        let tp = termination_point_key(&node("ovsdb://uuid/1/bridge/br0"), "vxlan0").unwrap();
        let port = port_key(&tp);

        assert_eq!(port.termination_point().node().node_id().as_str(), "ovsdb://uuid/1/bridge/br0");
        assert_eq!(port.termination_point().node().topology().topology_id(), "ovsdb:1");
        assert_eq!(
            port.to_string(),
            "/network-topology/topology[ovsdb:1]/node[ovsdb://uuid/1/bridge/br0]/termination-point[vxlan0]/port"
        );
        assert_eq!(
            bridge_key(&node("n1")).to_string(),
            "/network-topology/topology[ovsdb:1]/node[n1]/bridge"
        );
    }

    #[test]
    fn test_empty_components_are_rejected() {
        assert!(matches!(topology_key(""), Err(ResolveError::InvalidKey(_))));
        assert!(matches!(node_key(&ovsdb_topology_key(), ""), Err(ResolveError::InvalidKey(_))));
        assert!(matches!(
            termination_point_key(&node("n1"), ""),
            Err(ResolveError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_parse_every_target() {
        let tp = termination_point_key(&node("ovsdb://uuid/1/bridge/br0"), "dpdk0").unwrap();
        let paths: Vec<InstancePath> = vec![
            ovsdb_topology_key().into(),
            node("ovsdb://uuid/1").into(),
            bridge_key(&node("ovsdb://uuid/1/bridge/br0")).into(),
            tp.clone().into(),
            port_key(&tp).into(),
        ];
        let targets = [
            PathTarget::Topology,
            PathTarget::Node,
            PathTarget::Bridge,
            PathTarget::TerminationPoint,
            PathTarget::Port,
        ];

        for (path, target) in paths.iter().zip(targets) {
            let parsed: InstancePath = path.to_string().parse().unwrap();
            assert_eq!(&parsed, path);
            assert_eq!(parsed.target(), target);
        }
    }

    #[test]
    fn test_node_key_of_nested_paths() {
        let tp = termination_point_key(&node("n1"), "p1").unwrap();
        assert_eq!(InstancePath::from(port_key(&tp)).node_key(), Some(&node("n1")));
        assert_eq!(InstancePath::from(ovsdb_topology_key()).node_key(), None);
    }

    #[test]
    fn test_unrecognised_paths() {
        for bad in [
            "",
            "ovsdb:1/node[n1]",
            "/network-topology/topology[ovsdb:1",
            "/network-topology/topology[ovsdb:1]/node[n1",
            "/network-topology/topology[ovsdb:1]/node[]",
            "/network-topology/topology[ovsdb:1]/node[n1]/port",
            "/network-topology/topology[ovsdb:1]/link[l1]",
        ] {
            assert!(
                matches!(bad.parse::<InstancePath>(), Err(ResolveError::InvalidKey(_))),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn test_node_ref_json() {
        let json = "\"/network-topology/topology[ovsdb:1]/node[ovsdb://uuid/1]\"";
        let node_ref: NodeRef = serde_json::from_str(json).unwrap();
        assert_eq!(node_ref.target(), PathTarget::Node);
        assert_eq!(serde_json::to_string(&node_ref).unwrap(), json);
    }
}
