// SPDX-License-Identifier: Apache-2.0

//! Removes pass-through (`wire`) nets, splicing each consumer directly onto
//! the root producer of the copy chain it read from.

use std::collections::HashMap;

use crate::netlist::net::{Net, Op};
use crate::netlist::wire::WireRef;
use crate::netlist::Netlist;
use crate::netsynth_error::NetsynthError;

/// Substitution map from a removed wire to the wire that replaces it.
///
/// Entries are all inserted before any is resolved; `resolve` follows the
/// chain to a wire that has no entry.
#[derive(Debug, Default)]
pub(crate) struct Substitutions {
    map: HashMap<WireRef, WireRef>,
}

impl Substitutions {
    pub(crate) fn insert(&mut self, from: WireRef, to: WireRef) {
        self.map.insert(from, to);
    }

    pub(crate) fn contains(&self, wire: WireRef) -> bool {
        self.map.contains_key(&wire)
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    pub(crate) fn resolve(&self, wire: WireRef) -> Result<WireRef, NetsynthError> {
        let mut current = wire;
        // A chain can visit each entry at most once.
        for _ in 0..=self.map.len() {
            match self.map.get(&current) {
                Some(next) => {
                    log::trace!("resolve: %{} -> %{}", current.id, next.id);
                    current = *next;
                }
                None => return Ok(current),
            }
        }
        Err(NetsynthError::InternalConsistency(format!(
            "substitution chain starting at %{} is cyclic",
            wire.id
        )))
    }

    pub(crate) fn resolve_net(&self, net: &Net) -> Result<Net, NetsynthError> {
        let args = net
            .args
            .iter()
            .map(|a| self.resolve(*a))
            .collect::<Result<Vec<WireRef>, NetsynthError>>()?;
        Ok(net.with_args(args))
    }
}

/// Removes every `wire` net whose destination is not an Output and deletes the
/// destination wires. Returns the number of nets removed.
///
/// The netlist is validated before and after; a malformed input surfaces as a
/// `Validation` error with nothing removed.
pub fn remove_wire_nets(netlist: &mut Netlist) -> Result<usize, NetsynthError> {
    netlist.sanity_check()?;
    let mut substitutions = Substitutions::default();
    for net in netlist.nets() {
        if net.op == Op::Wire && !netlist.get_wire(net.dest()).is_output() {
            substitutions.insert(net.dest(), net.args[0]);
        }
    }

    let mut new_nets = Vec::with_capacity(netlist.nets().len() - substitutions.len());
    for net in netlist.nets() {
        if net.op == Op::Wire && substitutions.contains(net.dest()) {
            continue;
        }
        new_nets.push(substitutions.resolve_net(net)?);
    }

    let removed: Vec<WireRef> = netlist
        .nets()
        .iter()
        .filter(|net| net.op == Op::Wire && substitutions.contains(net.dest()))
        .map(|net| net.dest())
        .collect();
    netlist.set_nets(new_nets);
    for wire in removed.iter() {
        netlist.remove_wire(*wire)?;
    }
    log::debug!(
        "remove_wire_nets: removed {} copy nets from '{}'",
        removed.len(),
        netlist.name
    );
    netlist.sanity_check()?;
    Ok(removed.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist::wire::WireKind;

    #[test]
    fn test_copy_into_output_is_kept() {
        let mut n = Netlist::new("keep");
        let a = n.add_input("a", 1).unwrap();
        let o = n.add_output("o", 1).unwrap();
        n.add_net(Net::new(Op::Wire, vec![a], o)).unwrap();
        assert_eq!(remove_wire_nets(&mut n).unwrap(), 0);
        assert_eq!(n.nets(), &[Net::new(Op::Wire, vec![a], o)]);
    }

    #[test]
    fn test_consumers_are_spliced_to_root() {
        let mut n = Netlist::new("splice");
        let a = n.add_input("a", 1).unwrap();
        let b = n.add_input("b", 1).unwrap();
        let t0 = n.add_wire("t0", 1, WireKind::Plain).unwrap();
        let t1 = n.add_wire("t1", 1, WireKind::Plain).unwrap();
        let o = n.add_output("o", 1).unwrap();
        n.add_net(Net::new(Op::Wire, vec![a], t0)).unwrap();
        n.add_net(Net::new(Op::Wire, vec![t0], t1)).unwrap();
        n.add_net(Net::new(Op::And, vec![t1, b], o)).unwrap();

        assert_eq!(remove_wire_nets(&mut n).unwrap(), 2);
        assert_eq!(n.nets(), &[Net::new(Op::And, vec![a, b], o)]);
        assert!(!n.is_live(t0));
        assert!(!n.is_live(t1));
    }

    #[test]
    fn test_copy_without_source_is_a_validation_error() {
        let mut n = Netlist::new("no_src");
        let o = n.add_output("o", 1).unwrap();
        let t = n.add_wire("t", 1, WireKind::Plain).unwrap();
        n.set_nets(vec![Net {
            op: Op::Wire,
            params: None,
            args: vec![],
            dests: vec![t],
        }]);
        let before = n.to_string();
        assert!(matches!(
            remove_wire_nets(&mut n),
            Err(NetsynthError::Validation(_))
        ));
        assert_eq!(n.to_string(), before);
        assert!(n.is_live(o));
    }

    #[test]
    fn test_cyclic_substitution_is_reported() {
        let mut subs = Substitutions::default();
        let x = WireRef { id: 0 };
        let y = WireRef { id: 1 };
        subs.insert(x, y);
        subs.insert(y, x);
        assert!(matches!(
            subs.resolve(x),
            Err(NetsynthError::InternalConsistency(_))
        ));
    }
}
