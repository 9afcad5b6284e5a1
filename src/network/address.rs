use std::{
    fmt::Display,
    net::{Ipv4Addr, Ipv6Addr},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// Management or locator address. Either family is accepted; nothing else is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpAddress {
    V4(Ipv4Addr),
    V6(Ipv6Addr),
}

impl FromStr for IpAddress {
    type Err = ResolveError;

    /// IPv4 is tried first, then IPv6.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(v4) = trimmed.parse::<Ipv4Addr>() {
            return Ok(IpAddress::V4(v4));
        }
        tracing::debug!("{} is not an IPv4 address", trimmed);
        if let Ok(v6) = trimmed.parse::<Ipv6Addr>() {
            return Ok(IpAddress::V6(v6));
        }
        tracing::debug!("{} is not an IPv6 address", trimmed);
        Err(ResolveError::InvalidIpAddress(s.to_string()))
    }
}

impl Display for IpAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IpAddress::V4(addr) => write!(f, "{}", addr),
            IpAddress::V6(addr) => write!(f, "{}", addr),
        }
    }
}

impl From<Ipv4Addr> for IpAddress {
    fn from(addr: Ipv4Addr) -> Self {
        IpAddress::V4(addr)
    }
}

impl From<Ipv6Addr> for IpAddress {
    fn from(addr: Ipv6Addr) -> Self {
        IpAddress::V6(addr)
    }
}

// Serialized as the plain textual address so fixtures stay readable

impl Serialize for IpAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for IpAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_families() {
        assert_eq!(
            "10.0.0.1".parse::<IpAddress>().unwrap(),
            IpAddress::V4(Ipv4Addr::new(10, 0, 0, 1))
        );
        assert_eq!(
            "fe80::1".parse::<IpAddress>().unwrap(),
            IpAddress::V6("fe80::1".parse().unwrap())
        );
    }

    #[test]
    fn test_reject_non_address() {
        assert_eq!(
            "10.0.0.256".parse::<IpAddress>(),
            Err(ResolveError::InvalidIpAddress("10.0.0.256".to_string()))
        );
        assert!("ovsdb:1".parse::<IpAddress>().is_err());
    }

    #[test]
    fn test_string_form_survives_json() {
        let addr: IpAddress = serde_json::from_str("\"192.168.1.10\"").unwrap();
        assert_eq!(addr.to_string(), "192.168.1.10");
        assert_eq!(serde_json::to_string(&addr).unwrap(), "\"192.168.1.10\"");
    }
}
