// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use serde::Serialize;

use crate::netlist::Netlist;
use crate::use_count::get_wire_use_counts;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SummaryStats {
    pub net_count: usize,
    pub wire_count: usize,
    /// Op name to number of nets using it.
    pub op_histogram: BTreeMap<String, usize>,
    /// Wire kind keyword to number of wires of that kind.
    pub wire_kinds: BTreeMap<String, usize>,
    pub total_wire_bits: usize,
    /// Largest number of readers of any single wire.
    pub max_fanout: usize,
}

pub fn get_summary_stats(netlist: &Netlist) -> SummaryStats {
    let mut op_histogram = BTreeMap::new();
    for net in netlist.nets() {
        *op_histogram.entry(net.op.name().to_string()).or_insert(0) += 1;
    }
    let mut wire_kinds = BTreeMap::new();
    let mut total_wire_bits = 0;
    for wire_ref in netlist.wire_refs() {
        let wire = netlist.get_wire(wire_ref);
        *wire_kinds.entry(wire.kind.keyword().to_string()).or_insert(0) += 1;
        total_wire_bits += wire.bit_count;
    }
    let max_fanout = get_wire_use_counts(netlist)
        .values()
        .copied()
        .max()
        .unwrap_or(0);
    SummaryStats {
        net_count: netlist.nets().len(),
        wire_count: netlist.wire_count(),
        op_histogram,
        wire_kinds,
        total_wire_bits,
        max_fanout,
    }
}
