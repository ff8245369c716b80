// SPDX-License-Identifier: Apache-2.0

//! The `Netlist` owns one circuit: an arena of wires (signal nodes), a name
//! index over them, and the ordered list of nets (operation nodes) connecting
//! them.
//!
//! Passes borrow a `Netlist` for the duration of a transformation; they either
//! mutate it through the primitives below or build an independent copy.

pub mod net;
pub mod serdes;
pub mod validate;
pub mod wire;

use std::collections::HashMap;

use crate::bits::Bits;
use crate::netsynth_error::NetsynthError;
use net::{Net, OpSet};
use validate::ValidationError;
use wire::{Wire, WireKind, WireRef};

fn check_bit_count(name: &str, bit_count: usize) -> Result<(), NetsynthError> {
    if bit_count == 0 {
        return Err(NetsynthError::Usage(format!(
            "wire '{}' must be at least one bit wide",
            name
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct Netlist {
    pub name: String,
    /// Removed wires leave a `None` so that handles stay stable.
    wires: Vec<Option<Wire>>,
    wire_by_name: HashMap<String, WireRef>,
    nets: Vec<Net>,
    legal_ops: OpSet,
    next_uid: usize,
}

impl Netlist {
    pub fn new(name: &str) -> Self {
        Self::with_legal_ops(name, OpSet::all())
    }

    pub fn with_legal_ops(name: &str, legal_ops: OpSet) -> Self {
        Self {
            name: name.to_string(),
            wires: Vec::new(),
            wire_by_name: HashMap::new(),
            nets: Vec::new(),
            legal_ops,
            next_uid: 0,
        }
    }

    pub fn legal_ops(&self) -> &OpSet {
        &self.legal_ops
    }

    pub fn set_legal_ops(&mut self, legal_ops: OpSet) {
        self.legal_ops = legal_ops;
    }

    pub fn add_wire(
        &mut self,
        name: &str,
        bit_count: usize,
        kind: WireKind,
    ) -> Result<WireRef, NetsynthError> {
        if self.wire_by_name.contains_key(name) {
            return Err(NetsynthError::DuplicateWireName(name.to_string()));
        }
        check_bit_count(name, bit_count)?;
        if let WireKind::Const(value) = &kind {
            if value.get_bit_count() != bit_count {
                return Err(NetsynthError::Usage(format!(
                    "constant wire '{}' declared as bits[{}] but holds a {}-bit value",
                    name,
                    bit_count,
                    value.get_bit_count()
                )));
            }
        }
        let wire_ref = WireRef {
            id: self.wires.len(),
        };
        self.wires.push(Some(Wire {
            name: name.to_string(),
            bit_count,
            kind,
        }));
        self.wire_by_name.insert(name.to_string(), wire_ref);
        Ok(wire_ref)
    }

    pub fn add_input(&mut self, name: &str, bit_count: usize) -> Result<WireRef, NetsynthError> {
        self.add_wire(name, bit_count, WireKind::Input)
    }

    pub fn add_output(&mut self, name: &str, bit_count: usize) -> Result<WireRef, NetsynthError> {
        self.add_wire(name, bit_count, WireKind::Output)
    }

    /// Returns a name starting with `prefix` that no wire currently uses.
    pub fn make_unique_name(&mut self, prefix: &str) -> String {
        loop {
            let candidate = format!("{}_{}", prefix, self.next_uid);
            self.next_uid += 1;
            if !self.wire_by_name.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Adds a wire whose name is generated from `prefix`; this cannot collide.
    pub fn add_unique_wire(
        &mut self,
        prefix: &str,
        bit_count: usize,
        kind: WireKind,
    ) -> Result<WireRef, NetsynthError> {
        check_bit_count(prefix, bit_count)?;
        let name = self.make_unique_name(prefix);
        let wire_ref = WireRef {
            id: self.wires.len(),
        };
        self.wires.push(Some(Wire {
            name: name.clone(),
            bit_count,
            kind,
        }));
        self.wire_by_name.insert(name, wire_ref);
        Ok(wire_ref)
    }

    pub fn add_const(&mut self, value: Bits) -> Result<WireRef, NetsynthError> {
        let prefix = format!("const_{}", value.to_u64().unwrap_or(0));
        let bit_count = value.get_bit_count();
        self.add_unique_wire(&prefix, bit_count, WireKind::Const(value))
    }

    /// Appends a net, rejecting ops outside the netlist's legal alphabet.
    pub fn add_net(&mut self, net: Net) -> Result<(), NetsynthError> {
        if !self.legal_ops.contains(net.op) {
            return Err(NetsynthError::Usage(format!(
                "op '{}' is not in the legal alphabet '{}' of netlist '{}'",
                net.op, self.legal_ops, self.name
            )));
        }
        self.nets.push(net);
        Ok(())
    }

    /// Replaces the whole set of nets.
    pub fn set_nets(&mut self, nets: Vec<Net>) {
        self.nets = nets;
    }

    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    /// Removes the wire from the arena and the name index. Nets that still
    /// reference it will be flagged by `sanity_check`.
    pub fn remove_wire(&mut self, wire_ref: WireRef) -> Result<Wire, NetsynthError> {
        let slot = self.wires.get_mut(wire_ref.id).ok_or_else(|| {
            NetsynthError::InternalConsistency(format!(
                "attempted to remove unknown wire {:?}",
                wire_ref
            ))
        })?;
        let wire = slot.take().ok_or_else(|| {
            NetsynthError::InternalConsistency(format!(
                "attempted to remove wire {:?} twice",
                wire_ref
            ))
        })?;
        self.wire_by_name.remove(&wire.name);
        Ok(wire)
    }

    pub fn is_live(&self, wire_ref: WireRef) -> bool {
        matches!(self.wires.get(wire_ref.id), Some(Some(_)))
    }

    pub fn try_get_wire(&self, wire_ref: WireRef) -> Option<&Wire> {
        self.wires.get(wire_ref.id).and_then(|w| w.as_ref())
    }

    /// Panics if the handle does not refer to a live wire.
    pub fn get_wire(&self, wire_ref: WireRef) -> &Wire {
        self.try_get_wire(wire_ref)
            .unwrap_or_else(|| panic!("wire {:?} is not live in '{}'", wire_ref, self.name))
    }

    pub fn wire_by_name(&self, name: &str) -> Option<WireRef> {
        self.wire_by_name.get(name).copied()
    }

    /// Live wires in creation order.
    pub fn wire_refs(&self) -> impl Iterator<Item = WireRef> + '_ {
        self.wires
            .iter()
            .enumerate()
            .filter(|(_, w)| w.is_some())
            .map(|(id, _)| WireRef { id })
    }

    pub fn wire_count(&self) -> usize {
        self.wire_by_name.len()
    }

    pub fn inputs(&self) -> Vec<WireRef> {
        self.wire_refs()
            .filter(|w| self.get_wire(*w).is_input())
            .collect()
    }

    pub fn outputs(&self) -> Vec<WireRef> {
        self.wire_refs()
            .filter(|w| self.get_wire(*w).is_output())
            .collect()
    }

    pub fn sanity_check(&self) -> Result<(), ValidationError> {
        validate::sanity_check(self)
    }

    fn wire_name(&self, wire_ref: WireRef) -> String {
        match self.try_get_wire(wire_ref) {
            Some(wire) => wire.name.clone(),
            None => format!("<dead %{}>", wire_ref.id),
        }
    }

    pub fn net_to_string(&self, net: &Net) -> String {
        let args = net
            .args
            .iter()
            .map(|a| self.wire_name(*a))
            .collect::<Vec<String>>()
            .join(", ");
        let params = match &net.params {
            Some(indices) => format!(
                ", indices=[{}]",
                indices
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<String>>()
                    .join(", ")
            ),
            None => String::new(),
        };
        let dests = net
            .dests
            .iter()
            .map(|d| self.wire_name(*d))
            .collect::<Vec<String>>()
            .join(", ");
        format!("{} = {}({}{})", dests, net.op, args, params)
    }
}

impl std::fmt::Display for Netlist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "netlist {} [{}] {{", self.name, self.legal_ops)?;
        for wire_ref in self.wire_refs() {
            writeln!(f, "  {}", self.get_wire(wire_ref))?;
        }
        for net in self.nets.iter() {
            writeln!(f, "  {}", self.net_to_string(net))?;
        }
        write!(f, "}}")
    }
}
