// SPDX-License-Identifier: Apache-2.0

//! Helper routines for lowering wide operations to single-bit gates.
//!
//! * generate_add: instantiates a ripple-carry adder, recursively from the
//!   least significant bit
//! * generate_add_iterative: the same gate structure built with a loop, for
//!   widths where recursion depth matters

use crate::gate_builder::{FullAdderOutput, GateBuilder};
use crate::netlist::wire::WireRef;
use crate::netsynth_error::NetsynthError;

/// Widths above this are always built iteratively.
pub const DEFAULT_RECURSIVE_ADDER_MAX_WIDTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdderMapping {
    /// Recursive ripple-carry, falling back to the iterative generator above
    /// the configured width bound.
    #[default]
    Recursive,
    Iterative,
}

impl std::fmt::Display for AdderMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdderMapping::Recursive => write!(f, "recursive"),
            AdderMapping::Iterative => write!(f, "iterative"),
        }
    }
}

impl std::str::FromStr for AdderMapping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recursive" => Ok(AdderMapping::Recursive),
            "iterative" => Ok(AdderMapping::Iterative),
            _ => Err(format!(
                "unknown adder mapping '{}'; expected 'recursive' or 'iterative'",
                s
            )),
        }
    }
}

/// Output of a ripple-carry adder: `sum` has one bit per operand bit, index 0
/// the least significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdderOutput {
    pub sum: Vec<WireRef>,
    pub carry_out: WireRef,
}

// The truth table for an adder bit is:
//
//  a b c | sum cout
// --------
//  0 0 0 | 0   0
//  0 0 1 | 1   0
//  0 1 0 | 1   0
//  0 1 1 | 0   1
//  1 0 0 | 1   0
//  1 0 1 | 0   1
//  1 1 0 | 0   1
//  1 1 1 | 1   1
//
// sum = a ^ b ^ c_in
// cout = (a & b) | (a & c_in) | (b & c_in)
fn generate_one_bit_add(
    a: WireRef,
    b: WireRef,
    c_in: WireRef,
    gb: &mut GateBuilder,
) -> Result<FullAdderOutput, NetsynthError> {
    gb.add_full_adder(a, b, c_in)
}

fn check_operands(lhs: &[WireRef], rhs: &[WireRef]) -> Result<(), NetsynthError> {
    if lhs.len() != rhs.len() || lhs.is_empty() {
        return Err(NetsynthError::InternalConsistency(format!(
            "ripple-carry adder needs equal non-empty operands; got {} and {} bits",
            lhs.len(),
            rhs.len()
        )));
    }
    Ok(())
}

/// Recursive ripple-carry adder. The least significant bit is summed first and
/// its carry feeds the recursion over the remaining higher bits; recursion
/// depth equals the operand width.
pub fn generate_add(
    lhs: &[WireRef],
    rhs: &[WireRef],
    c_in: WireRef,
    gb: &mut GateBuilder,
) -> Result<AdderOutput, NetsynthError> {
    check_operands(lhs, rhs)?;
    let lsb = generate_one_bit_add(lhs[0], rhs[0], c_in, gb)?;
    if lhs.len() == 1 {
        return Ok(AdderOutput {
            sum: vec![lsb.sum],
            carry_out: lsb.carry,
        });
    }
    let msbs = generate_add(&lhs[1..], &rhs[1..], lsb.carry, gb)?;
    let mut sum = Vec::with_capacity(lhs.len());
    sum.push(lsb.sum);
    sum.extend(msbs.sum);
    Ok(AdderOutput {
        sum,
        carry_out: msbs.carry_out,
    })
}

/// Iterative ripple-carry adder; emits exactly the gates `generate_add` does,
/// in the same order.
pub fn generate_add_iterative(
    lhs: &[WireRef],
    rhs: &[WireRef],
    mut c_in: WireRef,
    gb: &mut GateBuilder,
) -> Result<AdderOutput, NetsynthError> {
    check_operands(lhs, rhs)?;
    let mut sum = Vec::with_capacity(lhs.len());
    for (a, b) in lhs.iter().zip(rhs.iter()) {
        let bit = generate_one_bit_add(*a, *b, c_in, gb)?;
        sum.push(bit.sum);
        c_in = bit.carry;
    }
    Ok(AdderOutput {
        sum,
        carry_out: c_in,
    })
}

/// Picks the generator for the requested mapping, bounding recursion depth by
/// `recursive_max_width`.
pub fn generate_add_with_mapping(
    lhs: &[WireRef],
    rhs: &[WireRef],
    c_in: WireRef,
    mapping: AdderMapping,
    recursive_max_width: usize,
    gb: &mut GateBuilder,
) -> Result<AdderOutput, NetsynthError> {
    match mapping {
        AdderMapping::Recursive if lhs.len() <= recursive_max_width => {
            generate_add(lhs, rhs, c_in, gb)
        }
        AdderMapping::Recursive => {
            log::debug!(
                "adder width {} exceeds recursion bound {}; building iteratively",
                lhs.len(),
                recursive_max_width
            );
            generate_add_iterative(lhs, rhs, c_in, gb)
        }
        AdderMapping::Iterative => generate_add_iterative(lhs, rhs, c_in, gb),
    }
}
