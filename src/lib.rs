/*!
Resolves service function forwarders onto Open vSwitch bridges.

Given a forwarder and a snapshot of the OVSDB topology, the crate finds the bridge the
forwarder lives on, the `openflow:<n>` id of that switch, and the OpenFlow port numbers of
its VXLAN, VXLAN-GPE and DPDK ports.
*/

pub mod config;
pub mod error;
pub mod network;
pub mod resolver;
pub mod topology;

pub use config::ResolverConfig;
pub use error::{ResolveError, ResolveResult};
pub use resolver::{Resolver, forwarder::ForwarderReport};
