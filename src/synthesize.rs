// SPDX-License-Identifier: Apache-2.0

//! Lowers a netlist in the full operation alphabet into a fresh netlist whose
//! wires are all one bit wide and whose nets use only the gate basis
//! `{wire, not, and, or, xor, reg}`.

use std::collections::HashMap;

use crate::bits::Bits;
use crate::gate_builder::GateBuilder;
use crate::netlist::net::{Net, Op, OpSet};
use crate::netlist::wire::{WireKind, WireRef};
use crate::netlist::Netlist;
use crate::netsynth_error::NetsynthError;
use crate::synth_utils::{
    generate_add_with_mapping, AdderMapping, DEFAULT_RECURSIVE_ADDER_MAX_WIDTH,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthOptions {
    pub adder_mapping: AdderMapping,
    /// Adders wider than this are built iteratively even under
    /// `AdderMapping::Recursive`.
    pub recursive_adder_max_width: usize,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            adder_mapping: AdderMapping::default(),
            recursive_adder_max_width: DEFAULT_RECURSIVE_ADDER_MAX_WIDTH,
        }
    }
}

/// Maps `(source wire, bit index)` to the 1-bit wire that carries that bit in
/// the synthesized netlist.
pub type WireBitMap = HashMap<(WireRef, usize), WireRef>;

#[derive(Debug)]
pub struct SynthOutput {
    pub netlist: Netlist,
    pub wire_map: WireBitMap,
}

struct Lowering<'a> {
    src: &'a Netlist,
    wire_map: &'a WireBitMap,
    options: &'a SynthOptions,
}

impl<'a> Lowering<'a> {
    /// Returns the destination bits of `wire`, least significant first.
    fn bits(&self, wire: WireRef) -> Result<Vec<WireRef>, NetsynthError> {
        let bit_count = self.src.get_wire(wire).bit_count;
        (0..bit_count)
            .map(|i| {
                self.wire_map.get(&(wire, i)).copied().ok_or_else(|| {
                    NetsynthError::InternalConsistency(format!(
                        "no synthesized wire for bit {} of '{}'",
                        i,
                        self.src.get_wire(wire).name
                    ))
                })
            })
            .collect()
    }

    fn copy_bits(
        gb: &mut GateBuilder,
        dest: &[WireRef],
        src: &[WireRef],
    ) -> Result<(), NetsynthError> {
        for (d, s) in dest.iter().zip(src.iter()) {
            gb.add_copy(*d, *s)?;
        }
        Ok(())
    }

    fn lower_net(&self, net: &Net, gb: &mut GateBuilder) -> Result<(), NetsynthError> {
        let dest = self.bits(net.dest())?;
        let args = net
            .args
            .iter()
            .map(|a| self.bits(*a))
            .collect::<Result<Vec<Vec<WireRef>>, NetsynthError>>()?;
        match net.op {
            Op::Wire => Self::copy_bits(gb, &dest, &args[0]),
            Op::Not => {
                for (d, a) in dest.iter().zip(args[0].iter()) {
                    gb.netlist_mut().add_net(Net::new(Op::Not, vec![*a], *d))?;
                }
                Ok(())
            }
            Op::And | Op::Or | Op::Xor => {
                for (i, d) in dest.iter().enumerate() {
                    gb.netlist_mut()
                        .add_net(Net::new(net.op, vec![args[0][i], args[1][i]], *d))?;
                }
                Ok(())
            }
            Op::Eq => {
                let diffs = args[0]
                    .iter()
                    .zip(args[1].iter())
                    .map(|(a, b)| gb.add_xor_binary(*a, *b))
                    .collect::<Result<Vec<WireRef>, NetsynthError>>()?;
                let any_diff = gb.add_or_nary(&diffs)?;
                let equal = gb.add_not(any_diff)?;
                gb.add_copy(dest[0], equal)
            }
            Op::Mux => {
                let selector = args[0][0];
                for (i, d) in dest.iter().enumerate() {
                    let chosen = gb.add_mux2(selector, args[1][i], args[2][i])?;
                    gb.add_copy(*d, chosen)?;
                }
                Ok(())
            }
            Op::Select => {
                let indices = net.params.as_ref().ok_or_else(|| {
                    NetsynthError::InternalConsistency(format!(
                        "select net without indices: {}",
                        self.src.net_to_string(net)
                    ))
                })?;
                let picked: Vec<WireRef> = indices.iter().map(|i| args[0][*i]).collect();
                Self::copy_bits(gb, &dest, &picked)
            }
            Op::Concat => {
                // The last argument supplies the least significant bits.
                let flattened: Vec<WireRef> = args.iter().rev().flatten().copied().collect();
                Self::copy_bits(gb, &dest, &flattened)
            }
            Op::Reg => {
                for (d, a) in dest.iter().zip(args[0].iter()) {
                    gb.add_reg(*d, *a)?;
                }
                Ok(())
            }
            Op::Add => {
                let carry_in = gb.add_const_bit(false)?;
                let adder = generate_add_with_mapping(
                    &args[0],
                    &args[1],
                    carry_in,
                    self.options.adder_mapping,
                    self.options.recursive_adder_max_width,
                    gb,
                )?;
                let mut result = adder.sum;
                result.push(adder.carry_out);
                Self::copy_bits(gb, &dest, &result)
            }
        }
    }
}

/// Expands every wire of `src` into 1-bit wires in `dst`, keeping each wire's
/// kind; constants take the corresponding bit of their value.
fn expand_wires(src: &Netlist, dst: &mut Netlist) -> Result<WireBitMap, NetsynthError> {
    let mut wire_map = WireBitMap::new();
    for wire_ref in src.wire_refs() {
        let wire = src.get_wire(wire_ref);
        for i in 0..wire.bit_count {
            let kind = match &wire.kind {
                WireKind::Const(value) => WireKind::Const(Bits::bool(value.get_bit(i))),
                other => other.clone(),
            };
            let bit = dst.add_unique_wire(&format!("synth_{}_{}", wire.name, i), 1, kind)?;
            wire_map.insert((wire_ref, i), bit);
        }
    }
    Ok(wire_map)
}

/// Builds a new netlist, bit-level equivalent to `src`, restricted to the gate
/// basis. `src` is validated first and left untouched.
pub fn synthesize(src: &Netlist, options: &SynthOptions) -> Result<SynthOutput, NetsynthError> {
    src.sanity_check()?;
    log::info!(
        "synthesize: lowering '{}' ({} wires, {} nets)",
        src.name,
        src.wire_count(),
        src.nets().len()
    );
    let mut netlist = Netlist::with_legal_ops(&src.name, OpSet::synthesized());
    let wire_map = expand_wires(src, &mut netlist)?;
    let lowering = Lowering {
        src,
        wire_map: &wire_map,
        options,
    };
    {
        let mut gb = GateBuilder::new(&mut netlist);
        for net in src.nets() {
            log::trace!("synthesize: lowering {}", src.net_to_string(net));
            lowering.lower_net(net, &mut gb)?;
        }
    }
    netlist.sanity_check()?;
    log::info!(
        "synthesize: '{}' lowered to {} wires and {} nets",
        netlist.name,
        netlist.wire_count(),
        netlist.nets().len()
    );
    log::debug!("synthesized netlist:\n{}", netlist);
    Ok(SynthOutput { netlist, wire_map })
}

/// Replaces `netlist` with its synthesized form, returning the bit map from the
/// old wire handles. On error `netlist` is unchanged.
pub fn synthesize_in_place(
    netlist: &mut Netlist,
    options: &SynthOptions,
) -> Result<WireBitMap, NetsynthError> {
    let SynthOutput {
        netlist: synthesized,
        wire_map,
    } = synthesize(netlist, options)?;
    *netlist = synthesized;
    Ok(wire_map)
}
