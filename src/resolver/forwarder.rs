/*!
Forwarder resolution.

Maps a forwarder onto the OpenFlow switch backing it:
forwarder locator IP -> management node -> bridge node -> datapath id -> `openflow:<n>`.
*/

use serde::Serialize;

use crate::{
    network::{
        address::IpAddress,
        datapath,
        forwarder::{BridgeBinding, Forwarder, IpLocator, LocatorType, Transport},
        node::NodeId,
    },
    resolver::Resolver,
    topology::{
        path::{bridge_key, node_key},
        store::TopologyStore,
    },
};

/// First forwarder, in slice order, owning an IP locator with address `ip`.
pub fn find_by_ip<'f>(forwarders: &'f [Forwarder], ip: &IpAddress) -> Option<&'f Forwarder> {
    forwarders
        .iter()
        .find(|forwarder| forwarder.ip_locators().any(|locator| &locator.ip == ip))
}

/// IP locator of the forwarder's first VXLAN-GPE data plane locator.
pub fn extended_tunnel_locator(forwarder: &Forwarder) -> Option<&IpLocator> {
    let dpl = forwarder
        .data_plane_locators
        .iter()
        .find(|dpl| dpl.transport == Transport::TunnelExtended)?;
    match &dpl.locator_type {
        LocatorType::Ip(ip) => Some(ip),
        LocatorType::Other => None,
    }
}

/// Copy of `forwarder` caching `switch_node_id` in its bridge binding.
/// Without an id the forwarder is returned unchanged.
pub fn with_switch_node_id(forwarder: &Forwarder, switch_node_id: Option<String>) -> Forwarder {
    let mut annotated = forwarder.clone();
    if let Some(id) = switch_node_id {
        annotated
            .bridge
            .get_or_insert_with(BridgeBinding::default)
            .switch_node_id = Some(id);
    }
    annotated
}

/// Everything the resolver can tell about one forwarder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForwarderReport {
    pub name: String,
    pub bridge_node_id: Option<String>,
    pub switch_node_id: Option<String>,
    pub tunnel_port: Option<u32>,
    pub extended_tunnel_port: Option<u32>,
    pub accelerated_port: Option<u32>,
}

impl<S: TopologyStore + ?Sized> Resolver<'_, S> {
    /// `openflow:<n>` id of the switch backing `forwarder`.
    pub fn switch_node_id(&self, forwarder: &Forwarder) -> Option<String> {
        let Some(bridge_node_id) = self.resolve_forwarder_bridge_node_id(forwarder) else {
            tracing::warn!("No node id for forwarder {}", forwarder.name);
            return None;
        };
        self.switch_node_id_of(&bridge_node_id, &forwarder.name)
    }

    /// Resolves the switch id and caches it on a copy of `forwarder`.
    pub fn annotate_switch_node_id(&self, forwarder: &Forwarder) -> Forwarder {
        with_switch_node_id(forwarder, self.switch_node_id(forwarder))
    }

    pub fn report(&self, forwarder: &Forwarder) -> ForwarderReport {
        let bridge_node_id = self.resolve_forwarder_bridge_node_id(forwarder);
        let switch_node_id = bridge_node_id
            .as_ref()
            .and_then(|id| self.switch_node_id_of(id, &forwarder.name));

        let (tunnel_port, extended_tunnel_port, accelerated_port) = match &switch_node_id {
            Some(id) => (
                self.tunnel_port(id),
                self.extended_tunnel_port(id),
                self.accelerated_port(id, None),
            ),
            None => (None, None, None),
        };

        ForwarderReport {
            name: forwarder.name.clone(),
            bridge_node_id: bridge_node_id.map(|id| id.to_string()),
            switch_node_id,
            tunnel_port,
            extended_tunnel_port,
            accelerated_port,
        }
    }

    fn switch_node_id_of(&self, bridge_node_id: &NodeId, forwarder_name: &str) -> Option<String> {
        let key = match node_key(&self.topology, bridge_node_id.as_str()) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!("Bad bridge node id for forwarder {}: {}", forwarder_name, e);
                return None;
            }
        };
        let Some(bridge) = self.store.read_bridge(&bridge_key(&key)) else {
            tracing::warn!("Cannot read bridge {} of forwarder {}", bridge_node_id, forwarder_name);
            return None;
        };
        let Some(dpid) = bridge.datapath_id else {
            tracing::warn!("No datapath id for forwarder {}", forwarder_name);
            return None;
        };

        match datapath::to_node_id(&dpid) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("Unusable datapath id for forwarder {}: {}", forwarder_name, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        network::{
            forwarder::DataPlaneLocator,
            node::{BridgeAugmentation, ConnectionInfo, ManagerAugmentation, Node, Topology},
        },
        topology::{
            path::{NodeRef, ovsdb_topology_key},
            store::MemoryStore,
        },
    };

    fn store() -> MemoryStore {
        MemoryStore::from_json_str(include_str!("../../test_data/topology_snapshot.json")).unwrap()
    }

    fn forwarders() -> Vec<Forwarder> {
        serde_json::from_str(include_str!("../../test_data/forwarders.json")).unwrap()
    }

    fn ip_locator(name: &str, transport: Transport, ip: &str) -> DataPlaneLocator {
        DataPlaneLocator::new(
            name,
            transport,
            LocatorType::Ip(IpLocator::new(ip.parse().unwrap(), Some(6633))),
        )
    }

    #[test]
    fn test_switch_node_id_end_to_end() {
        let manager = Node::new(NodeId::new("node:1")).with_manager(ManagerAugmentation {
            connection_info: Some(ConnectionInfo {
                remote_ip: "10.0.0.1".parse().unwrap(),
                remote_port: None,
                local_ip: None,
            }),
            ovs_version: None,
        });
        let bridge = Node::new(NodeId::new("node:1/bridge/br0")).with_bridge(BridgeAugmentation {
            bridge_name: Some("br0".to_string()),
            datapath_id: Some("00:00:00:00:00:01:02:03".to_string()),
            managed_by: Some(NodeRef::new(node_key(&ovsdb_topology_key(), "node:1").unwrap())),
            ..BridgeAugmentation::default()
        });
        let store = MemoryStore::new(vec![Topology {
            topology_id: "ovsdb:1".to_string(),
            nodes: vec![manager, bridge],
        }]);
        let resolver = Resolver::new(&store);

        let fwd = Forwarder::new("sff")
            .with_locator(ip_locator("dpl", Transport::TunnelPlain, "10.0.0.1"))
            .with_bridge("br0");

        assert_eq!(
            resolver.resolve_forwarder_bridge_node_id(&fwd).unwrap().as_str(),
            "node:1/bridge/br0"
        );
        assert_eq!(resolver.switch_node_id(&fwd).as_deref(), Some("openflow:66051"));
    }

    #[test]
    fn test_switch_node_id_for_fixtures() {
        let store = store();
        let resolver = Resolver::new(&store);

        let ids: Vec<Option<String>> = forwarders().iter().map(|f| resolver.switch_node_id(f)).collect();
        assert_eq!(
            ids,
            [
                Some("openflow:66051".to_string()),
                Some("openflow:42".to_string()),
                // malformed datapath id
                None,
                // no IP locator
                None,
                // bridge not in the store
                None,
            ]
        );
    }

    #[test]
    fn test_find_by_ip_first_match() {
        let forwarders = forwarders();

        // sff1 and sff5 share 192.168.1.10
        let found = find_by_ip(&forwarders, &"192.168.1.10".parse().unwrap()).unwrap();
        assert_eq!(found.name, "sff1");

        let found = find_by_ip(&forwarders, &"fd00::20".parse().unwrap()).unwrap();
        assert_eq!(found.name, "sff2");

        assert!(find_by_ip(&forwarders, &"10.1.1.1".parse().unwrap()).is_none());
        assert!(find_by_ip(&[], &"10.1.1.1".parse().unwrap()).is_none());
    }

    #[test]
    fn test_extended_tunnel_locator() {
        let fwd = Forwarder::new("sff")
            .with_locator(ip_locator("plain", Transport::TunnelPlain, "10.0.0.1"))
            .with_locator(ip_locator("gpe", Transport::TunnelExtended, "10.0.0.2"))
            .with_locator(ip_locator("gpe2", Transport::TunnelExtended, "10.0.0.3"));
        assert_eq!(
            extended_tunnel_locator(&fwd).map(|l| l.ip.to_string()).as_deref(),
            Some("10.0.0.2")
        );

        let non_ip = Forwarder::new("sff")
            .with_locator(DataPlaneLocator::new("gpe", Transport::TunnelExtended, LocatorType::Other))
            .with_locator(ip_locator("gpe2", Transport::TunnelExtended, "10.0.0.3"));
        assert!(extended_tunnel_locator(&non_ip).is_none());

        let plain_only = Forwarder::new("sff").with_locator(ip_locator("plain", Transport::TunnelPlain, "10.0.0.1"));
        assert!(extended_tunnel_locator(&plain_only).is_none());
    }

    #[test]
    fn test_annotate_switch_node_id() {
        let store = store();
        let resolver = Resolver::new(&store);
        let forwarders = forwarders();

        let annotated = resolver.annotate_switch_node_id(&forwarders[0]);
        let binding = annotated.bridge.unwrap();
        assert_eq!(binding.bridge_name.as_deref(), Some("br-sfc"));
        assert_eq!(binding.switch_node_id.as_deref(), Some("openflow:66051"));

        // unresolved forwarders come back untouched
        assert_eq!(resolver.annotate_switch_node_id(&forwarders[3]), forwarders[3]);

        let unbound = with_switch_node_id(&Forwarder::new("sff"), Some("openflow:1".to_string()));
        assert_eq!(
            unbound.bridge,
            Some(BridgeBinding {
                bridge_name: None,
                switch_node_id: Some("openflow:1".to_string()),
            })
        );
    }

    #[test]
    fn test_reports() {
        let store = store();
        let resolver = Resolver::new(&store);
        let forwarders = forwarders();

        let sff1 = resolver.report(&forwarders[0]);
        assert_eq!(sff1.switch_node_id.as_deref(), Some("openflow:66051"));
        assert!(matches!(sff1.tunnel_port, Some(1..=3)));
        assert_eq!(sff1.extended_tunnel_port, Some(2));
        assert_eq!(sff1.accelerated_port, None);

        assert_eq!(
            resolver.report(&forwarders[1]),
            ForwarderReport {
                name: "sff2".to_string(),
                bridge_node_id: Some("ovsdb://uuid/b/bridge/br-dpdk".to_string()),
                switch_node_id: Some("openflow:42".to_string()),
                tunnel_port: Some(9),
                extended_tunnel_port: None,
                accelerated_port: Some(7),
            }
        );

        let sff3 = resolver.report(&forwarders[2]);
        assert_eq!(sff3.bridge_node_id.as_deref(), Some("ovsdb://uuid/a/bridge/br-int"));
        assert_eq!(sff3.switch_node_id, None);
        assert_eq!(sff3.tunnel_port, None);
    }

    #[test]
    fn test_concurrent_resolution() {
        let store = store();
        let resolver = Resolver::new(&store);
        let forwarders = forwarders();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| resolver.switch_node_id(&forwarders[1])))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap().as_deref(), Some("openflow:42"));
            }
        });
    }
}
