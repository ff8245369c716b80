// SPDX-License-Identifier: Apache-2.0

//! Cycle-based reference simulator for netlists in any op alphabet.
//!
//! Nets are evaluated in a precomputed topological order; register outputs
//! are read from the state latched at the end of the previous cycle, so they
//! break cycles. Registers start at zero.

use std::collections::{HashMap, VecDeque};

use crate::bits::Bits;
use crate::netlist::net::{Net, Op};
use crate::netlist::wire::{WireKind, WireRef};
use crate::netlist::Netlist;
use crate::netsynth_error::NetsynthError;

fn add_bits(lhs: &Bits, rhs: &Bits) -> Bits {
    let mut carry = false;
    let mut sum = Vec::with_capacity(lhs.get_bit_count() + 1);
    for (a, b) in lhs.iter_lsb_to_msb().zip(rhs.iter_lsb_to_msb()) {
        sum.push(a ^ b ^ carry);
        carry = (a & b) | (a & carry) | (b & carry);
    }
    sum.push(carry);
    Bits::from_lsb_is_0(&sum)
}

fn concat_bits(values: &[&Bits]) -> Bits {
    let bits: Vec<bool> = values
        .iter()
        .rev()
        .flat_map(|v| v.iter_lsb_to_msb())
        .collect();
    Bits::from_lsb_is_0(&bits)
}

/// Evaluates one net given its argument values.
pub fn eval_net(net: &Net, args: &[&Bits]) -> Result<Bits, NetsynthError> {
    let value = match (net.op, args) {
        (Op::Wire | Op::Reg, [a]) => (*a).clone(),
        (Op::Not, [a]) => a.not(),
        (Op::And, [a, b]) => a.and(b),
        (Op::Or, [a, b]) => a.or(b),
        (Op::Xor, [a, b]) => a.xor(b),
        (Op::Eq, [a, b]) => Bits::bool(a == b),
        (Op::Mux, [select, on_false, on_true]) => {
            if select.get_bit(0) {
                (*on_true).clone()
            } else {
                (*on_false).clone()
            }
        }
        (Op::Select, [a]) => {
            let indices = net.params.as_deref().unwrap_or(&[]);
            let bits: Vec<bool> = indices.iter().map(|i| a.get_bit(*i)).collect();
            Bits::from_lsb_is_0(&bits)
        }
        (Op::Concat, values) if !values.is_empty() => concat_bits(values),
        (Op::Add, [a, b]) => add_bits(a, b),
        _ => {
            return Err(NetsynthError::InternalConsistency(format!(
                "cannot evaluate op '{}' with {} arguments",
                net.op,
                args.len()
            )))
        }
    };
    Ok(value)
}

/// Orders net indices so that every net comes after the nets producing its
/// arguments. Register nets produce nothing combinationally.
fn topo_order(netlist: &Netlist) -> Result<Vec<usize>, NetsynthError> {
    let nets = netlist.nets();
    let mut producer: HashMap<WireRef, usize> = HashMap::new();
    for (i, net) in nets.iter().enumerate() {
        if net.op != Op::Reg {
            producer.insert(net.dest(), i);
        }
    }
    let mut pending = vec![0usize; nets.len()];
    let mut users: Vec<Vec<usize>> = vec![Vec::new(); nets.len()];
    for (i, net) in nets.iter().enumerate() {
        for arg in net.args.iter() {
            if let Some(p) = producer.get(arg) {
                pending[i] += 1;
                users[*p].push(i);
            }
        }
    }
    let mut ready: VecDeque<usize> = (0..nets.len()).filter(|i| pending[*i] == 0).collect();
    let mut order = Vec::with_capacity(nets.len());
    while let Some(i) = ready.pop_front() {
        order.push(i);
        for user in users[i].iter() {
            pending[*user] -= 1;
            if pending[*user] == 0 {
                ready.push_back(*user);
            }
        }
    }
    if order.len() != nets.len() {
        return Err(NetsynthError::Usage(format!(
            "netlist '{}' contains a combinational cycle",
            netlist.name
        )));
    }
    Ok(order)
}

pub struct Simulator<'a> {
    netlist: &'a Netlist,
    order: Vec<usize>,
    registers: HashMap<WireRef, Bits>,
}

impl<'a> Simulator<'a> {
    pub fn new(netlist: &'a Netlist) -> Result<Self, NetsynthError> {
        netlist.sanity_check()?;
        let order = topo_order(netlist)?;
        let registers = netlist
            .wire_refs()
            .filter(|w| netlist.get_wire(*w).is_register())
            .map(|w| (w, Bits::zero(netlist.get_wire(w).bit_count)))
            .collect();
        Ok(Self {
            netlist,
            order,
            registers,
        })
    }

    /// Current register contents by wire name.
    pub fn register_values(&self) -> HashMap<String, Bits> {
        self.registers
            .iter()
            .map(|(w, v)| (self.netlist.get_wire(*w).name.clone(), v.clone()))
            .collect()
    }

    /// Evaluates one cycle with the given Input values (by name) and returns
    /// the Output values by name, then latches register next-states.
    pub fn step(
        &mut self,
        inputs: &HashMap<String, Bits>,
    ) -> Result<HashMap<String, Bits>, NetsynthError> {
        let netlist = self.netlist;
        let mut values: HashMap<WireRef, Bits> = HashMap::new();
        for wire_ref in netlist.wire_refs() {
            let wire = netlist.get_wire(wire_ref);
            let value = match &wire.kind {
                WireKind::Input => {
                    let value = inputs.get(&wire.name).ok_or_else(|| {
                        NetsynthError::Usage(format!("no value given for input '{}'", wire.name))
                    })?;
                    if value.get_bit_count() != wire.bit_count {
                        return Err(NetsynthError::Usage(format!(
                            "input '{}' is bits[{}] but was given {}-bit value {}",
                            wire.name,
                            wire.bit_count,
                            value.get_bit_count(),
                            value
                        )));
                    }
                    value.clone()
                }
                WireKind::Const(value) => value.clone(),
                WireKind::Register => self.registers[&wire_ref].clone(),
                WireKind::Plain | WireKind::Output => continue,
            };
            values.insert(wire_ref, value);
        }

        let nets = netlist.nets();
        let mut next_state: Vec<(WireRef, Bits)> = Vec::new();
        for index in self.order.iter() {
            let net = &nets[*index];
            let args: Vec<&Bits> = net.args.iter().map(|a| &values[a]).collect();
            let result = eval_net(net, &args)?;
            if net.op == Op::Reg {
                next_state.push((net.dest(), result));
            } else {
                values.insert(net.dest(), result);
            }
        }
        for (wire_ref, value) in next_state {
            self.registers.insert(wire_ref, value);
        }

        Ok(netlist
            .outputs()
            .into_iter()
            .map(|o| (netlist.get_wire(o).name.clone(), values[&o].clone()))
            .collect())
    }
}
