//! Well-known identifiers and OVSDB interface option keys.

/// The OVSDB southbound topology.
pub const OVSDB_TOPOLOGY_ID: &str = "ovsdb:1";

/// Prefix of every switch-node identifier in the OpenFlow namespace.
pub const OPENFLOW_PREFIX: &str = "openflow:";

/// Separator between the managing node id and the bridge name in a bridge node id.
pub const BRIDGE_SEPARATOR: &str = "/bridge/";

pub const DEFAULT_ACCELERATED_PORT: &str = "dpdk0";

pub const OPTION_LOCAL_IP: &str = "local_ip";
pub const OPTION_REMOTE_IP: &str = "remote_ip";
pub const OPTION_DST_PORT: &str = "dst_port";
pub const OPTION_NSP: &str = "nsp";
pub const OPTION_NSI: &str = "nsi";
pub const OPTION_IN_NSP: &str = "in_nsp";
pub const OPTION_IN_NSI: &str = "in_nsi";
pub const OPTION_OUT_NSP: &str = "out_nsp";
pub const OPTION_OUT_NSI: &str = "out_nsi";
pub const OPTION_NSHC1: &str = "nshc1";
pub const OPTION_NSHC2: &str = "nshc2";
pub const OPTION_NSHC3: &str = "nshc3";
pub const OPTION_NSHC4: &str = "nshc4";
pub const OPTION_KEY: &str = "key";
pub const OPTION_EXTS: &str = "exts";

/// Option value meaning "computed per flow" rather than configured statically.
pub const VALUE_FLOW: &str = "flow";
/// Protocol extension carried by an extended (VXLAN-GPE) tunnel.
pub const VALUE_GPE: &str = "gpe";
