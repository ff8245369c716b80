// SPDX-License-Identifier: Apache-2.0

//! Structural validation ("sanity check") of a `Netlist`.

use std::collections::HashMap;

use super::net::{Net, Op};
use super::wire::{WireKind, WireRef};
use super::Netlist;

/// Errors that can arise during validation of a netlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A net's op is not in the netlist's legal alphabet.
    IllegalOp { net_index: usize, op: Op },
    /// A net does not have exactly one destination.
    BadDestCount { net_index: usize, count: usize },
    /// A net has the wrong number of arguments for its op.
    BadArgCount {
        net_index: usize,
        op: Op,
        count: usize,
    },
    /// A net references a wire that is not registered in the netlist.
    UnknownWire { net_index: usize, wire: WireRef },
    /// A net drives an Input or Const wire.
    DrivesSourceWire { net_index: usize, wire: String },
    /// A register net drives a non-register wire, or a register wire is driven
    /// by something other than a register net.
    RegisterMismatch { net_index: usize, wire: String },
    /// An Output wire is read by a net.
    OutputUsedAsArg { net_index: usize, wire: String },
    /// Params were given to an op that does not take any, or are missing.
    BadParams { net_index: usize, op: Op },
    /// The wire widths around a net do not satisfy the op's rule.
    WidthMismatch { net_index: usize, detail: String },
    /// A wire is declared with no bits.
    ZeroWidth(String),
    /// A wire that needs a producer has none.
    Undriven(String),
    /// A wire has more than one producer.
    MultiplyDriven(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::IllegalOp { net_index, op } => {
                write!(f, "net {} uses op '{}' outside the legal alphabet", net_index, op)
            }
            ValidationError::BadDestCount { net_index, count } => {
                write!(f, "net {} has {} destinations; expected 1", net_index, count)
            }
            ValidationError::BadArgCount {
                net_index,
                op,
                count,
            } => write!(
                f,
                "net {} ({}) has {} arguments",
                net_index, op, count
            ),
            ValidationError::UnknownWire { net_index, wire } => {
                write!(f, "net {} references unknown wire %{}", net_index, wire.id)
            }
            ValidationError::DrivesSourceWire { net_index, wire } => {
                write!(f, "net {} drives input/const wire '{}'", net_index, wire)
            }
            ValidationError::RegisterMismatch { net_index, wire } => {
                write!(
                    f,
                    "net {} mixes register and non-register usage of wire '{}'",
                    net_index, wire
                )
            }
            ValidationError::OutputUsedAsArg { net_index, wire } => {
                write!(f, "net {} reads output wire '{}'", net_index, wire)
            }
            ValidationError::BadParams { net_index, op } => {
                write!(f, "net {} has invalid params for op '{}'", net_index, op)
            }
            ValidationError::WidthMismatch { net_index, detail } => {
                write!(f, "net {} width mismatch: {}", net_index, detail)
            }
            ValidationError::ZeroWidth(name) => write!(f, "wire '{}' has zero width", name),
            ValidationError::Undriven(name) => write!(f, "wire '{}' has no producer", name),
            ValidationError::MultiplyDriven(name) => {
                write!(f, "wire '{}' has more than one producer", name)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

fn arg_count_ok(op: Op, count: usize) -> bool {
    match op {
        Op::Wire | Op::Not | Op::Reg | Op::Select => count == 1,
        Op::And | Op::Or | Op::Xor | Op::Eq | Op::Add => count == 2,
        Op::Mux => count == 3,
        Op::Concat => count >= 1,
    }
}

fn check_widths(net: &Net, net_index: usize, width: impl Fn(WireRef) -> usize) -> Result<(), ValidationError> {
    let mismatch = |detail: String| ValidationError::WidthMismatch { net_index, detail };
    let dest = width(net.dest());
    let args: Vec<usize> = net.args.iter().map(|a| width(*a)).collect();
    match net.op {
        Op::Wire | Op::Not | Op::Reg => {
            if dest != args[0] {
                return Err(mismatch(format!("dest {} vs arg {}", dest, args[0])));
            }
        }
        Op::And | Op::Or | Op::Xor => {
            if args[0] != args[1] || dest != args[0] {
                return Err(mismatch(format!(
                    "args {} and {} into dest {}",
                    args[0], args[1], dest
                )));
            }
        }
        Op::Eq => {
            if args[0] != args[1] || dest != 1 {
                return Err(mismatch(format!(
                    "comparing {} with {} into dest {}",
                    args[0], args[1], dest
                )));
            }
        }
        Op::Mux => {
            if args[0] != 1 || args[1] != args[2] || dest != args[1] {
                return Err(mismatch(format!(
                    "select {} choosing between {} and {} into dest {}",
                    args[0], args[1], args[2], dest
                )));
            }
        }
        Op::Select => {
            // Presence of params is checked by the caller.
            let indices = net.params.as_deref().unwrap_or(&[]);
            if dest != indices.len() {
                return Err(mismatch(format!(
                    "{} indices into dest {}",
                    indices.len(),
                    dest
                )));
            }
            if let Some(bad) = indices.iter().find(|i| **i >= args[0]) {
                return Err(mismatch(format!(
                    "index {} out of range for arg width {}",
                    bad, args[0]
                )));
            }
        }
        Op::Concat => {
            let total: usize = args.iter().sum();
            if dest != total {
                return Err(mismatch(format!("{} concatenated bits into dest {}", total, dest)));
            }
        }
        Op::Add => {
            if args[0] != args[1] || dest != args[0] + 1 {
                return Err(mismatch(format!(
                    "adding {} and {} into dest {}",
                    args[0], args[1], dest
                )));
            }
        }
    }
    Ok(())
}

/// Checks that every wire has at least one bit, that every referenced wire is
/// registered, that nets are well formed for their op, and that every wire
/// other than inputs and constants has exactly one producing net.
pub fn sanity_check(netlist: &Netlist) -> Result<(), ValidationError> {
    if let Some(wire) = netlist
        .wire_refs()
        .map(|w| netlist.get_wire(w))
        .find(|w| w.bit_count == 0)
    {
        return Err(ValidationError::ZeroWidth(wire.name.clone()));
    }
    let mut producer_count: HashMap<WireRef, usize> = HashMap::new();
    for (net_index, net) in netlist.nets().iter().enumerate() {
        if !netlist.legal_ops().contains(net.op) {
            return Err(ValidationError::IllegalOp {
                net_index,
                op: net.op,
            });
        }
        if net.dests.len() != 1 {
            return Err(ValidationError::BadDestCount {
                net_index,
                count: net.dests.len(),
            });
        }
        if !arg_count_ok(net.op, net.args.len()) {
            return Err(ValidationError::BadArgCount {
                net_index,
                op: net.op,
                count: net.args.len(),
            });
        }
        for wire in net.args.iter().chain(net.dests.iter()) {
            if !netlist.is_live(*wire) {
                return Err(ValidationError::UnknownWire {
                    net_index,
                    wire: *wire,
                });
            }
        }
        if net.params.is_some() != (net.op == Op::Select) {
            return Err(ValidationError::BadParams {
                net_index,
                op: net.op,
            });
        }

        let dest = netlist.get_wire(net.dest());
        if dest.is_source() {
            return Err(ValidationError::DrivesSourceWire {
                net_index,
                wire: dest.name.clone(),
            });
        }
        if (net.op == Op::Reg) != (dest.kind == WireKind::Register) {
            return Err(ValidationError::RegisterMismatch {
                net_index,
                wire: dest.name.clone(),
            });
        }
        if let Some(output) = net
            .args
            .iter()
            .map(|a| netlist.get_wire(*a))
            .find(|w| w.is_output())
        {
            return Err(ValidationError::OutputUsedAsArg {
                net_index,
                wire: output.name.clone(),
            });
        }
        check_widths(net, net_index, |w| netlist.get_wire(w).bit_count)?;

        *producer_count.entry(net.dest()).or_insert(0) += 1;
    }

    for wire_ref in netlist.wire_refs() {
        let wire = netlist.get_wire(wire_ref);
        match producer_count.get(&wire_ref).copied().unwrap_or(0) {
            0 if !wire.is_source() => return Err(ValidationError::Undriven(wire.name.clone())),
            n if n > 1 => return Err(ValidationError::MultiplyDriven(wire.name.clone())),
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::Bits;
    use crate::netlist::net::OpSet;
    use crate::netlist::wire::Wire;

    fn and_netlist() -> (Netlist, WireRef, WireRef, WireRef) {
        let mut n = Netlist::new("and");
        let a = n.add_input("a", 2).unwrap();
        let b = n.add_input("b", 2).unwrap();
        let o = n.add_output("o", 2).unwrap();
        (n, a, b, o)
    }

    #[test]
    fn test_valid_netlist_passes() {
        let (mut n, a, b, o) = and_netlist();
        n.add_net(Net::new(Op::And, vec![a, b], o)).unwrap();
        assert_eq!(n.sanity_check(), Ok(()));
    }

    #[test]
    fn test_undriven_output() {
        let (n, _, _, _) = and_netlist();
        assert_eq!(
            n.sanity_check(),
            Err(ValidationError::Undriven("o".to_string()))
        );
    }

    #[test]
    fn test_multiply_driven() {
        let (mut n, a, b, o) = and_netlist();
        n.add_net(Net::new(Op::And, vec![a, b], o)).unwrap();
        n.add_net(Net::new(Op::Or, vec![a, b], o)).unwrap();
        assert_eq!(
            n.sanity_check(),
            Err(ValidationError::MultiplyDriven("o".to_string()))
        );
    }

    #[test]
    fn test_dangling_reference_after_removal() {
        let (mut n, a, b, o) = and_netlist();
        n.add_net(Net::new(Op::And, vec![a, b], o)).unwrap();
        n.remove_wire(b).unwrap();
        assert_eq!(
            n.sanity_check(),
            Err(ValidationError::UnknownWire {
                net_index: 0,
                wire: b
            })
        );
    }

    #[test]
    fn test_width_rules() {
        let (mut n, a, _, _) = and_netlist();
        let narrow = n.add_input("c", 1).unwrap();
        let t = n.add_wire("t", 2, WireKind::Plain).unwrap();
        n.add_net(Net::new(Op::Xor, vec![a, narrow], t)).unwrap();
        assert!(matches!(
            n.sanity_check(),
            Err(ValidationError::WidthMismatch { net_index: 0, .. })
        ));
    }

    #[test]
    fn test_select_index_out_of_range() {
        let (mut n, a, _, o) = and_netlist();
        n.add_net(Net::select(a, vec![0, 2], o)).unwrap();
        assert!(matches!(
            n.sanity_check(),
            Err(ValidationError::WidthMismatch { net_index: 0, .. })
        ));
    }

    #[test]
    fn test_register_must_be_driven_by_reg() {
        let (mut n, a, _, o) = and_netlist();
        let r = n.add_wire("r", 2, WireKind::Register).unwrap();
        n.add_net(Net::new(Op::Wire, vec![a], r)).unwrap();
        n.add_net(Net::new(Op::Wire, vec![r], o)).unwrap();
        assert_eq!(
            n.sanity_check(),
            Err(ValidationError::RegisterMismatch {
                net_index: 0,
                wire: "r".to_string()
            })
        );
    }

    #[test]
    fn test_outputs_cannot_be_read() {
        let (mut n, a, _, o) = and_netlist();
        let o2 = n.add_output("o2", 2).unwrap();
        n.add_net(Net::new(Op::Wire, vec![a], o)).unwrap();
        n.add_net(Net::new(Op::Not, vec![o], o2)).unwrap();
        assert_eq!(
            n.sanity_check(),
            Err(ValidationError::OutputUsedAsArg {
                net_index: 1,
                wire: "o".to_string()
            })
        );
    }

    #[test]
    fn test_cannot_drive_constant() {
        let (mut n, a, _, _) = and_netlist();
        let k = n.add_const(Bits::make_ubits(2, 1).unwrap()).unwrap();
        n.add_net(Net::new(Op::Wire, vec![a], k)).unwrap();
        assert!(matches!(
            n.sanity_check(),
            Err(ValidationError::DrivesSourceWire { net_index: 0, .. })
        ));
    }

    #[test]
    fn test_zero_width_wire_rejected() {
        let (mut n, a, b, _) = and_netlist();
        // Builders refuse empty buses, so plant one directly in the arena.
        let empty = WireRef { id: n.wires.len() };
        n.wires.push(Some(Wire {
            name: "empty".to_string(),
            bit_count: 0,
            kind: WireKind::Plain,
        }));
        n.wire_by_name.insert("empty".to_string(), empty);
        n.add_net(Net::new(Op::Eq, vec![a, b], empty)).unwrap();
        assert_eq!(
            n.sanity_check(),
            Err(ValidationError::ZeroWidth("empty".to_string()))
        );
    }

    #[test]
    fn test_illegal_op_after_alphabet_narrowed() {
        let (mut n, a, b, _) = and_netlist();
        let s = n.add_output("s", 3).unwrap();
        n.add_net(Net::new(Op::Add, vec![a, b], s)).unwrap();
        n.set_legal_ops(OpSet::synthesized());
        assert_eq!(
            n.sanity_check(),
            Err(ValidationError::IllegalOp {
                net_index: 0,
                op: Op::Add
            })
        );
    }
}
