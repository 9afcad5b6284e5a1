/*!
Datapath identifier codec.

A datapath id is written as eight colon-separated hex groups (`00:00:aa:bb:cc:dd:ee:ff`).
Only groups 2..=7 carry the switch identity; groups 0 and 1 are validated but never
contribute to the value. Deployed OpenFlow node ids depend on exactly this layout.
*/

use crate::{
    error::{ResolveError, ResolveResult},
    network::options::OPENFLOW_PREFIX,
};

const DPID_GROUPS: usize = 8;
/// Left shift applied to groups 2..=7, most significant first.
const GROUP_SHIFTS: [u32; 6] = [40, 32, 24, 16, 8, 0];

/// Decodes the 48-bit switch value of a datapath id.
pub fn decode(dpid: &str) -> ResolveResult<u64> {
    let groups: Vec<&str> = dpid.split(':').collect();
    if groups.len() != DPID_GROUPS {
        return Err(ResolveError::MalformedDatapathId(dpid.to_string()));
    }

    let mut values = [0u64; DPID_GROUPS];
    for (value, group) in values.iter_mut().zip(&groups) {
        *value = parse_group(group).ok_or_else(|| ResolveError::MalformedDatapathId(dpid.to_string()))?;
    }

    Ok(values[2..]
        .iter()
        .zip(GROUP_SHIFTS)
        .fold(0u64, |acc, (value, shift)| acc | value << shift))
}

/// `openflow:<decimal>` for the given datapath id.
pub fn to_node_id(dpid: &str) -> ResolveResult<String> {
    Ok(format!("{}{}", OPENFLOW_PREFIX, decode(dpid)?))
}

fn parse_group(group: &str) -> Option<u64> {
    if group.is_empty() || group.len() > 16 {
        return None;
    }
    // hex wants whole bytes
    let group = if group.len() % 2 != 0 {
        format!("0{}", group)
    } else {
        group.to_string()
    };
    let bytes = hex::decode(&group).ok()?;
    Some(bytes.iter().fold(0u64, |acc, byte| acc << 8 | u64::from(*byte)))
}
