// SPDX-License-Identifier: Apache-2.0

//! Fixpoint constant propagation over a netlist in the single-bit gate basis.
//!
//! Each pass scans the nets once and decides a rewrite for every net that reads
//! a constant:
//!
//! * every operand constant: the net is evaluated and replaced by a constant
//! * one constant operand of a 1-bit `and`/`or`/`xor`: the net reduces to a
//!   constant, a pass-through of the other operand, or its inverse
//!
//! Decisions are collected before anything is mutated, then applied together:
//! destinations that are Outputs get fed through a copy, any other destination
//! is substituted away in the nets that read it. Passes repeat until one makes
//! no rewrite.

use crate::bits::Bits;
use crate::netlist::net::{Net, Op};
use crate::netlist::wire::{WireKind, WireRef};
use crate::netlist::Netlist;
use crate::netsynth_error::NetsynthError;
use crate::optimize::remove_wire_nets::Substitutions;
use crate::use_count::{get_unreferenced_wires, get_wire_use_counts};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstPropReport {
    /// Number of passes run, including the final one that changed nothing.
    pub passes: usize,
    pub nets_rewritten: usize,
    /// Inputs left with no readers after folding; they remain in the netlist.
    pub eliminated_inputs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Rewrite {
    Constant(Bits),
    PassThrough(WireRef),
    Invert(WireRef),
}

fn eval_binary(op: Op, lhs: &Bits, rhs: &Bits) -> Result<Bits, NetsynthError> {
    match op {
        Op::And => Ok(lhs.and(rhs)),
        Op::Or => Ok(lhs.or(rhs)),
        Op::Xor => Ok(lhs.xor(rhs)),
        _ => Err(NetsynthError::InternalConsistency(format!(
            "constant propagation cannot fold binary op '{}'",
            op
        ))),
    }
}

fn fold_all_constant(op: Op, values: &[&Bits]) -> Result<Bits, NetsynthError> {
    match (op, values) {
        (Op::Not, [value]) => Ok(value.not()),
        // Registers are treated as settled: the held value equals the value fed
        // to them.
        (Op::Reg, [value]) => Ok((*value).clone()),
        (Op::And | Op::Or | Op::Xor, [lhs, rhs]) => eval_binary(op, lhs, rhs),
        _ => Err(NetsynthError::InternalConsistency(format!(
            "constant propagation cannot fold op '{}' with {} operands",
            op,
            values.len()
        ))),
    }
}

/// Derives the rewrite for a 1-bit binary net with one constant operand by
/// substituting both values for the other operand.
fn simplify_one_constant(
    op: Op,
    constant: &Bits,
    other: WireRef,
) -> Result<Rewrite, NetsynthError> {
    let when_zero = eval_binary(op, constant, &Bits::bool(false))?;
    let when_one = eval_binary(op, constant, &Bits::bool(true))?;
    if when_zero == when_one {
        Ok(Rewrite::Constant(when_zero))
    } else if when_zero.is_zero() {
        Ok(Rewrite::PassThrough(other))
    } else {
        Ok(Rewrite::Invert(other))
    }
}

fn decide(netlist: &Netlist, net: &Net) -> Result<Option<Rewrite>, NetsynthError> {
    if net.op == Op::Wire {
        return Ok(None);
    }
    let constants: Vec<Option<&Bits>> = net
        .args
        .iter()
        .map(|a| netlist.get_wire(*a).const_value())
        .collect();
    let constant_count = constants.iter().filter(|c| c.is_some()).count();
    if constant_count == 0 {
        return Ok(None);
    }
    if !matches!(net.op, Op::Not | Op::And | Op::Or | Op::Xor | Op::Reg) {
        return Err(NetsynthError::InternalConsistency(format!(
            "constant propagation does not handle op '{}' in net {}",
            net.op,
            netlist.net_to_string(net)
        )));
    }
    if constant_count == net.args.len() {
        let values: Vec<&Bits> = constants.into_iter().flatten().collect();
        return Ok(Some(Rewrite::Constant(fold_all_constant(net.op, &values)?)));
    }
    // Exactly one of two operands is constant.
    if netlist.get_wire(net.dest()).bit_count != 1 {
        return Ok(None);
    }
    let (constant, other) = match (constants[0], constants[1]) {
        (Some(c), None) => (c, net.args[1]),
        (None, Some(c)) => (c, net.args[0]),
        _ => {
            return Err(NetsynthError::InternalConsistency(format!(
                "net {} has a partially constant operand list of unexpected shape",
                netlist.net_to_string(net)
            )))
        }
    };
    simplify_one_constant(net.op, constant, other).map(Some)
}

/// Runs one scan-and-rebuild pass; returns the number of nets rewritten.
fn propagate_once(
    netlist: &mut Netlist,
    eliminated_inputs: &mut Vec<String>,
) -> Result<usize, NetsynthError> {
    let mut decisions: Vec<Option<Rewrite>> = Vec::with_capacity(netlist.nets().len());
    for net in netlist.nets() {
        decisions.push(decide(netlist, net)?);
    }
    let rewrite_count = decisions.iter().filter(|d| d.is_some()).count();
    if rewrite_count == 0 {
        return Ok(0);
    }

    let old_nets: Vec<Net> = netlist.nets().to_vec();
    let mut substitutions = Substitutions::default();
    let mut removed_dests: Vec<WireRef> = Vec::new();
    // Inputs read by a net that folded to a constant.
    let mut folded_inputs: Vec<WireRef> = Vec::new();
    // Replacement net (if any) per original position, to keep net order stable.
    let mut replacements: Vec<Option<Net>> = Vec::with_capacity(old_nets.len());
    for (net, decision) in old_nets.iter().zip(decisions) {
        let Some(rewrite) = decision else {
            replacements.push(Some(net.clone()));
            continue;
        };
        log::debug!(
            "const_prop: {} => {:?}",
            netlist.net_to_string(net),
            rewrite
        );
        if matches!(rewrite, Rewrite::Constant(_)) {
            folded_inputs.extend(
                net.args
                    .iter()
                    .copied()
                    .filter(|a| netlist.get_wire(*a).is_input()),
            );
        }
        let dest = net.dest();
        let dest_is_output = netlist.get_wire(dest).is_output();
        let source = match rewrite {
            Rewrite::Invert(arg) => {
                replacements.push(Some(Net::new(Op::Not, vec![arg], dest)));
                continue;
            }
            Rewrite::Constant(value) => netlist.add_const(value)?,
            Rewrite::PassThrough(arg) => arg,
        };
        if dest_is_output {
            replacements.push(Some(Net::new(Op::Wire, vec![source], dest)));
        } else {
            substitutions.insert(dest, source);
            removed_dests.push(dest);
            replacements.push(None);
        }
    }

    let mut new_nets = Vec::with_capacity(replacements.len());
    for net in replacements.into_iter().flatten() {
        new_nets.push(substitutions.resolve_net(&net)?);
    }
    netlist.set_nets(new_nets);
    for dest in removed_dests {
        netlist.remove_wire(dest)?;
    }
    for wire_ref in get_unreferenced_wires(netlist) {
        let wire = netlist.get_wire(wire_ref);
        if matches!(wire.kind, WireKind::Input | WireKind::Output) {
            continue;
        }
        log::trace!("const_prop: sweeping unreferenced wire '{}'", wire.name);
        netlist.remove_wire(wire_ref)?;
    }

    // An input only counts as eliminated once no remaining net reads it.
    let use_counts = get_wire_use_counts(netlist);
    for input in folded_inputs {
        let name = &netlist.get_wire(input).name;
        if use_counts.contains_key(&input) || eliminated_inputs.contains(name) {
            continue;
        }
        log::warn!(
            "input '{}' of netlist '{}' was optimized away by constant folding",
            name,
            netlist.name
        );
        eliminated_inputs.push(name.clone());
    }
    Ok(rewrite_count)
}

/// Repeats constant-propagation passes until one rewrites nothing.
pub fn constant_propagation(netlist: &mut Netlist) -> Result<ConstPropReport, NetsynthError> {
    netlist.sanity_check()?;
    let mut report = ConstPropReport::default();
    loop {
        report.passes += 1;
        let rewritten = propagate_once(netlist, &mut report.eliminated_inputs)?;
        log::debug!(
            "const_prop: pass {} rewrote {} nets; {} nets remain",
            report.passes,
            rewritten,
            netlist.nets().len()
        );
        if rewritten == 0 {
            break;
        }
        report.nets_rewritten += rewritten;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Op::And, false => Rewrite::Constant(Bits::bool(false)); "and with zero")]
    #[test_case(Op::And, true => Rewrite::PassThrough(WireRef { id: 9 }); "and with one")]
    #[test_case(Op::Or, false => Rewrite::PassThrough(WireRef { id: 9 }); "or with zero")]
    #[test_case(Op::Or, true => Rewrite::Constant(Bits::bool(true)); "or with one")]
    #[test_case(Op::Xor, false => Rewrite::PassThrough(WireRef { id: 9 }); "xor with zero")]
    #[test_case(Op::Xor, true => Rewrite::Invert(WireRef { id: 9 }); "xor with one")]
    fn test_single_constant_truth_table(op: Op, constant: bool) -> Rewrite {
        simplify_one_constant(op, &Bits::bool(constant), WireRef { id: 9 }).unwrap()
    }

    #[test]
    fn test_all_constant_fold() {
        let one = Bits::bool(true);
        let zero = Bits::bool(false);
        assert_eq!(fold_all_constant(Op::Not, &[&one]).unwrap(), zero);
        assert_eq!(fold_all_constant(Op::Reg, &[&one]).unwrap(), one);
        assert_eq!(fold_all_constant(Op::Xor, &[&one, &one]).unwrap(), zero);
        assert!(fold_all_constant(Op::Eq, &[&one, &one]).is_err());
    }

    #[test]
    fn test_wide_single_constant_left_alone() {
        let mut n = Netlist::new("wide");
        let a = n.add_input("a", 2).unwrap();
        let k = n.add_const(Bits::make_ubits(2, 0).unwrap()).unwrap();
        let o = n.add_output("o", 2).unwrap();
        n.add_net(Net::new(Op::And, vec![a, k], o)).unwrap();
        let report = constant_propagation(&mut n).unwrap();
        assert_eq!(report.nets_rewritten, 0);
        assert_eq!(report.passes, 1);
        assert_eq!(n.nets(), &[Net::new(Op::And, vec![a, k], o)]);
    }

    #[test]
    fn test_unhandled_op_is_internal_error() {
        let mut n = Netlist::new("eq");
        let a = n.add_input("a", 1).unwrap();
        let k = n.add_const(Bits::bool(true)).unwrap();
        let o = n.add_output("o", 1).unwrap();
        n.add_net(Net::new(Op::Eq, vec![a, k], o)).unwrap();
        let before = n.nets().to_vec();
        assert!(matches!(
            constant_propagation(&mut n),
            Err(NetsynthError::InternalConsistency(_))
        ));
        assert_eq!(n.nets(), before.as_slice());
    }

    #[test]
    fn test_input_with_surviving_reader_is_not_eliminated() {
        // o1 = 0 & a; o2 = ~a
        let mut n = Netlist::new("shared");
        let a = n.add_input("a", 1).unwrap();
        let zero = n.add_const(Bits::bool(false)).unwrap();
        let o1 = n.add_output("o1", 1).unwrap();
        let o2 = n.add_output("o2", 1).unwrap();
        n.add_net(Net::new(Op::And, vec![zero, a], o1)).unwrap();
        n.add_net(Net::new(Op::Not, vec![a], o2)).unwrap();

        let report = constant_propagation(&mut n).unwrap();
        assert_eq!(report.nets_rewritten, 1);
        assert!(report.eliminated_inputs.is_empty());
        assert!(n.nets().contains(&Net::new(Op::Not, vec![a], o2)));
    }

    #[test]
    fn test_input_eliminated_once_last_reader_folds() {
        // t = 0 & a; o1 = t | b; o2 = 1 | a  ==>  a has no readers left
        let mut n = Netlist::new("last_reader");
        let a = n.add_input("a", 1).unwrap();
        let b = n.add_input("b", 1).unwrap();
        let zero = n.add_const(Bits::bool(false)).unwrap();
        let one = n.add_const(Bits::bool(true)).unwrap();
        let t = n.add_wire("t", 1, WireKind::Plain).unwrap();
        let o1 = n.add_output("o1", 1).unwrap();
        let o2 = n.add_output("o2", 1).unwrap();
        n.add_net(Net::new(Op::And, vec![zero, a], t)).unwrap();
        n.add_net(Net::new(Op::Or, vec![t, b], o1)).unwrap();
        n.add_net(Net::new(Op::Or, vec![one, a], o2)).unwrap();

        let report = constant_propagation(&mut n).unwrap();
        assert_eq!(report.eliminated_inputs, vec!["a".to_string()]);
        assert!(n.is_live(a));
        assert!(n.nets().iter().all(|net| !net.args.contains(&a)));
        assert_eq!(n.sanity_check(), Ok(()));
    }

    #[test]
    fn test_malformed_net_is_a_validation_error() {
        let mut n = Netlist::new("no_dest");
        let a = n.add_input("a", 1).unwrap();
        let mut net = Net::new(Op::Not, vec![a], a);
        net.dests.clear();
        n.set_nets(vec![net]);
        assert!(matches!(
            constant_propagation(&mut n),
            Err(NetsynthError::Validation(_))
        ));
    }

    #[test]
    fn test_chain_folds_across_passes() {
        // t = ~1; o = t | a  ==>  t = 0; o = a
        let mut n = Netlist::new("chain");
        let a = n.add_input("a", 1).unwrap();
        let one = n.add_const(Bits::bool(true)).unwrap();
        let t = n.add_wire("t", 1, WireKind::Plain).unwrap();
        let o = n.add_output("o", 1).unwrap();
        n.add_net(Net::new(Op::Not, vec![one], t)).unwrap();
        n.add_net(Net::new(Op::Or, vec![t, a], o)).unwrap();

        let report = constant_propagation(&mut n).unwrap();
        assert_eq!(report.passes, 3);
        assert_eq!(report.nets_rewritten, 2);
        assert!(report.eliminated_inputs.is_empty());
        assert_eq!(n.nets(), &[Net::new(Op::Wire, vec![a], o)]);
        assert!(!n.is_live(t));
        assert!(!n.is_live(one));
        assert_eq!(n.sanity_check(), Ok(()));
    }
}
