// SPDX-License-Identifier: Apache-2.0

//! Optimization of netlists already lowered to the single-bit gate basis.

pub mod const_prop;
pub mod remove_wire_nets;

use crate::netlist::net::OpSet;
use crate::netlist::Netlist;
use crate::netsynth_error::NetsynthError;
use const_prop::{constant_propagation, ConstPropReport};
use remove_wire_nets::remove_wire_nets;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptimizeReport {
    pub copies_removed: usize,
    pub const_prop: ConstPropReport,
}

fn check_gate_basis(netlist: &Netlist) -> Result<(), NetsynthError> {
    let basis = OpSet::synthesized();
    if let Some(net) = netlist.nets().iter().find(|n| !basis.contains(n.op)) {
        return Err(NetsynthError::Usage(format!(
            "optimize requires nets in the gate basis '{}' but '{}' contains {}; run synthesize first",
            basis,
            netlist.name,
            netlist.net_to_string(net)
        )));
    }
    Ok(())
}

/// Returns an optimized copy of `netlist`, leaving the argument untouched.
pub fn optimize(netlist: &Netlist) -> Result<(Netlist, OptimizeReport), NetsynthError> {
    check_gate_basis(netlist)?;
    netlist.sanity_check()?;
    let mut work = netlist.clone();
    log::info!(
        "optimize: '{}' starts with {} wires and {} nets",
        work.name,
        work.wire_count(),
        work.nets().len()
    );
    let copies_removed = remove_wire_nets(&mut work)?;
    let const_prop = constant_propagation(&mut work)?;
    work.sanity_check()?;
    log::info!(
        "optimize: '{}' ends with {} wires and {} nets after {} const-prop passes",
        work.name,
        work.wire_count(),
        work.nets().len(),
        const_prop.passes
    );
    Ok((
        work,
        OptimizeReport {
            copies_removed,
            const_prop,
        },
    ))
}

/// Optimizes `netlist` in place. The result is only installed once every pass
/// has succeeded, so on error the netlist is unchanged.
pub fn optimize_in_place(netlist: &mut Netlist) -> Result<OptimizeReport, NetsynthError> {
    let (optimized, report) = optimize(netlist)?;
    *netlist = optimized;
    Ok(report)
}
