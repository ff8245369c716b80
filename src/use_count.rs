// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use crate::netlist::wire::WireRef;
use crate::netlist::Netlist;

/// Computes how many net arguments read each wire.
///
/// Wires that are never read do not appear in the map; outputs are observed by
/// the environment rather than by nets, so they are counted once each.
pub fn get_wire_use_counts(netlist: &Netlist) -> HashMap<WireRef, usize> {
    let mut use_counts: HashMap<WireRef, usize> = HashMap::new();
    let mut bump_use_count = |wire: WireRef| {
        *use_counts.entry(wire).or_insert(0) += 1;
    };
    for output in netlist.outputs() {
        bump_use_count(output);
    }
    for net in netlist.nets() {
        for arg in net.args.iter() {
            bump_use_count(*arg);
        }
    }
    use_counts
}

/// Returns the live wires that no net reads or drives.
pub fn get_unreferenced_wires(netlist: &Netlist) -> Vec<WireRef> {
    let mut referenced = std::collections::HashSet::new();
    for net in netlist.nets() {
        referenced.extend(net.args.iter().copied());
        referenced.extend(net.dests.iter().copied());
    }
    netlist
        .wire_refs()
        .filter(|w| !referenced.contains(w))
        .collect()
}
