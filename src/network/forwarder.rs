/*!
Service function forwarders.

A forwarder is the logical device being placed onto a switch. It is not part of the
topology graph; callers hand one in per resolution and the resolver never keeps it.
*/

use serde::{Deserialize, Serialize};

use crate::network::address::IpAddress;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forwarder {
    pub name: String,
    #[serde(default)]
    pub data_plane_locators: Vec<DataPlaneLocator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge: Option<BridgeBinding>,
}

impl Forwarder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_plane_locators: Vec::new(),
            bridge: None,
        }
    }

    pub fn with_locator(mut self, locator: DataPlaneLocator) -> Self {
        self.data_plane_locators.push(locator);
        self
    }

    pub fn with_bridge(mut self, bridge_name: impl Into<String>) -> Self {
        self.bridge = Some(BridgeBinding {
            bridge_name: Some(bridge_name.into()),
            switch_node_id: None,
        });
        self
    }

    /// Addresses of the IP based locators, in locator order.
    pub fn ip_locators(&self) -> impl Iterator<Item = &IpLocator> {
        self.data_plane_locators
            .iter()
            .filter_map(|dpl| match &dpl.locator_type {
                LocatorType::Ip(ip) => Some(ip),
                LocatorType::Other => None,
            })
    }
}

/// The bridge a forwarder is attached to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeBinding {
    pub bridge_name: Option<String>,
    /// Cached `openflow:<n>` id of the bridge, once resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switch_node_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPlaneLocator {
    pub name: String,
    pub transport: Transport,
    pub locator_type: LocatorType,
}

impl DataPlaneLocator {
    pub fn new(name: impl Into<String>, transport: Transport, locator_type: LocatorType) -> Self {
        Self {
            name: name.into(),
            transport,
            locator_type,
        }
    }
}

/// Encapsulation carried over a locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transport {
    #[serde(rename = "vxlan")]
    TunnelPlain,
    #[serde(rename = "vxlan-gpe")]
    TunnelExtended,
    #[serde(rename = "other")]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorType {
    Ip(IpLocator),
    /// Mac, LISP, function-call and similar locators. Never resolved here.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IpLocator {
    pub ip: IpAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl IpLocator {
    pub fn new(ip: IpAddress, port: Option<u16>) -> Self {
        Self { ip, port }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarders_deserialization() {
        let json = include_str!("../../test_data/forwarders.json");
        let forwarders: Vec<Forwarder> = serde_json::from_str(json).unwrap();

        assert_eq!(forwarders.len(), 5);
        let sff1 = &forwarders[0];
        assert_eq!(sff1.name, "sff1");
        assert_eq!(sff1.data_plane_locators[0].transport, Transport::TunnelExtended);
        assert_eq!(
            sff1.bridge.as_ref().unwrap().bridge_name.as_deref(),
            Some("br-sfc")
        );

        let sff3 = &forwarders[2];
        assert_eq!(sff3.data_plane_locators[1].locator_type, LocatorType::Other);
    }

    #[test]
    fn test_ip_locators_skip_other_types() {
        let fwd = Forwarder::new("sff")
            .with_locator(DataPlaneLocator::new("a", Transport::Other, LocatorType::Other))
            .with_locator(DataPlaneLocator::new(
                "b",
                Transport::TunnelPlain,
                LocatorType::Ip(IpLocator::new("10.0.0.2".parse().unwrap(), Some(4789))),
            ));

        let ips: Vec<_> = fwd.ip_locators().map(|l| l.ip.to_string()).collect();
        assert_eq!(ips, ["10.0.0.2"]);
    }
}
