// SPDX-License-Identifier: Apache-2.0

//! The `GateBuilder` emits single-bit gates into a `Netlist` -- every call
//! creates a fresh 1-bit temporary wire plus the net that drives it.
//!
//! Basic example usage:
//! ```
//! use netsynth::gate_builder::GateBuilder;
//! use netsynth::netlist::Netlist;
//! use netsynth::netlist::net::OpSet;
//!
//! let mut netlist = Netlist::with_legal_ops("my_and_gate", OpSet::synthesized());
//! let a = netlist.add_input("a", 1).unwrap();
//! let b = netlist.add_input("b", 1).unwrap();
//! let o = netlist.add_output("o", 1).unwrap();
//! let mut builder = GateBuilder::new(&mut netlist);
//! let a_and_b = builder.add_and_binary(a, b).unwrap();
//! builder.add_copy(o, a_and_b).unwrap();
//! assert!(netlist.sanity_check().is_ok());
//! ```

use crate::netlist::net::{Net, Op};
use crate::netlist::wire::{WireKind, WireRef};
use crate::netlist::Netlist;
use crate::netsynth_error::NetsynthError;

const TEMP_PREFIX: &str = "tmp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullAdderOutput {
    pub sum: WireRef,
    pub carry: WireRef,
}

pub struct GateBuilder<'a> {
    netlist: &'a mut Netlist,
}

impl<'a> GateBuilder<'a> {
    pub fn new(netlist: &'a mut Netlist) -> Self {
        Self { netlist }
    }

    pub fn netlist(&self) -> &Netlist {
        self.netlist
    }

    pub fn netlist_mut(&mut self) -> &mut Netlist {
        self.netlist
    }

    pub fn add_const_bit(&mut self, value: bool) -> Result<WireRef, NetsynthError> {
        self.netlist.add_const(crate::bits::Bits::bool(value))
    }

    fn add_gate(&mut self, op: Op, args: Vec<WireRef>) -> Result<WireRef, NetsynthError> {
        let dest = self
            .netlist
            .add_unique_wire(TEMP_PREFIX, 1, WireKind::Plain)?;
        self.netlist.add_net(Net::new(op, args, dest))?;
        Ok(dest)
    }

    pub fn add_not(&mut self, arg: WireRef) -> Result<WireRef, NetsynthError> {
        self.add_gate(Op::Not, vec![arg])
    }

    pub fn add_and_binary(&mut self, lhs: WireRef, rhs: WireRef) -> Result<WireRef, NetsynthError> {
        self.add_gate(Op::And, vec![lhs, rhs])
    }

    pub fn add_or_binary(&mut self, lhs: WireRef, rhs: WireRef) -> Result<WireRef, NetsynthError> {
        self.add_gate(Op::Or, vec![lhs, rhs])
    }

    pub fn add_xor_binary(&mut self, lhs: WireRef, rhs: WireRef) -> Result<WireRef, NetsynthError> {
        self.add_gate(Op::Xor, vec![lhs, rhs])
    }

    /// Linear (left-to-right) reduction: `((a0 op a1) op a2) ...`.
    fn reduce_linear(
        &mut self,
        args: &[WireRef],
        f: fn(&mut Self, WireRef, WireRef) -> Result<WireRef, NetsynthError>,
    ) -> Result<WireRef, NetsynthError> {
        let (first, rest) = args.split_first().ok_or_else(|| {
            NetsynthError::InternalConsistency("reduction over zero operands".to_string())
        })?;
        let mut accum = *first;
        for arg in rest {
            accum = f(self, accum, *arg)?;
        }
        Ok(accum)
    }

    pub fn add_or_nary(&mut self, args: &[WireRef]) -> Result<WireRef, NetsynthError> {
        self.reduce_linear(args, Self::add_or_binary)
    }

    pub fn add_xor_nary(&mut self, args: &[WireRef]) -> Result<WireRef, NetsynthError> {
        self.reduce_linear(args, Self::add_xor_binary)
    }

    /// Returns the 3-input majority function (aka the full-adder carry):
    ///
    /// \(maj(a, b, c) = (a \& b) | (a \& c) | (b \& c)\).
    pub fn add_maj3(&mut self, a: WireRef, b: WireRef, c: WireRef) -> Result<WireRef, NetsynthError> {
        let ab = self.add_and_binary(a, b)?;
        let ac = self.add_and_binary(a, c)?;
        let bc = self.add_and_binary(b, c)?;
        self.add_or_nary(&[ab, ac, bc])
    }

    /// Emits a 1-bit full-adder.
    pub fn add_full_adder(
        &mut self,
        a: WireRef,
        b: WireRef,
        c: WireRef,
    ) -> Result<FullAdderOutput, NetsynthError> {
        let sum = self.add_xor_nary(&[a, b, c])?;
        let carry = self.add_maj3(a, b, c)?;
        Ok(FullAdderOutput { sum, carry })
    }

    /// `(!selector & on_false) | (selector & on_true)`
    pub fn add_mux2(
        &mut self,
        selector: WireRef,
        on_false: WireRef,
        on_true: WireRef,
    ) -> Result<WireRef, NetsynthError> {
        let not_selector = self.add_not(selector)?;
        let false_term = self.add_and_binary(not_selector, on_false)?;
        let true_term = self.add_and_binary(selector, on_true)?;
        self.add_or_binary(false_term, true_term)
    }

    /// Drives an existing wire from `src` with a pass-through net.
    pub fn add_copy(&mut self, dest: WireRef, src: WireRef) -> Result<(), NetsynthError> {
        self.netlist.add_net(Net::new(Op::Wire, vec![src], dest))
    }

    pub fn add_reg(&mut self, dest: WireRef, next: WireRef) -> Result<(), NetsynthError> {
        self.netlist.add_net(Net::new(Op::Reg, vec![next], dest))
    }
}
