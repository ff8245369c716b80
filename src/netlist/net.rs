// SPDX-License-Identifier: Apache-2.0

//! Operation nodes ("nets") and the closed alphabet of operations they carry.

use std::collections::BTreeSet;
use std::fmt;

use crate::netlist::wire::WireRef;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum Op {
    /// 1-to-1 pass-through with no logical effect.
    Wire,
    Not,
    And,
    Or,
    Xor,
    Eq,
    /// `mux(select, when_false, when_true)`
    Mux,
    /// Bit-select; the net's params hold one source index per destination bit.
    Select,
    /// Concatenation; the first argument lands in the most significant bits.
    Concat,
    Reg,
    Add,
}

pub const ALL_OPS: [Op; 11] = [
    Op::Wire,
    Op::Not,
    Op::And,
    Op::Or,
    Op::Xor,
    Op::Eq,
    Op::Mux,
    Op::Select,
    Op::Concat,
    Op::Reg,
    Op::Add,
];

impl Op {
    pub fn symbol(&self) -> char {
        match self {
            Op::Wire => 'w',
            Op::Not => '~',
            Op::And => '&',
            Op::Or => '|',
            Op::Xor => '^',
            Op::Eq => '=',
            Op::Mux => 'm',
            Op::Select => 's',
            Op::Concat => 'c',
            Op::Reg => 'r',
            Op::Add => '+',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Op> {
        ALL_OPS.iter().copied().find(|op| op.symbol() == symbol)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Op::Wire => "wire",
            Op::Not => "not",
            Op::And => "and",
            Op::Or => "or",
            Op::Xor => "xor",
            Op::Eq => "eq",
            Op::Mux => "mux",
            Op::Select => "select",
            Op::Concat => "concat",
            Op::Reg => "reg",
            Op::Add => "add",
        }
    }

    pub fn from_name(name: &str) -> Option<Op> {
        ALL_OPS.iter().copied().find(|op| op.name() == name)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The legal operation alphabet a netlist declares it conforms to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpSet {
    ops: BTreeSet<Op>,
}

impl OpSet {
    pub fn all() -> Self {
        Self {
            ops: ALL_OPS.iter().copied().collect(),
        }
    }

    /// The single-bit gate basis produced by synthesis.
    pub fn synthesized() -> Self {
        Self::from_ops(&[Op::Wire, Op::Not, Op::And, Op::Or, Op::Xor, Op::Reg])
    }

    pub fn from_ops(ops: &[Op]) -> Self {
        Self {
            ops: ops.iter().copied().collect(),
        }
    }

    /// Parses a string of op symbols, e.g. `"~&|^rw"`.
    pub fn from_symbols(symbols: &str) -> Result<Self, String> {
        let mut ops = BTreeSet::new();
        for c in symbols.chars().filter(|c| !c.is_whitespace()) {
            match Op::from_symbol(c) {
                Some(op) => {
                    ops.insert(op);
                }
                None => return Err(format!("unknown op symbol '{}'", c)),
            }
        }
        Ok(Self { ops })
    }

    pub fn contains(&self, op: Op) -> bool {
        self.ops.contains(&op)
    }

    pub fn is_subset(&self, other: &OpSet) -> bool {
        self.ops.is_subset(&other.ops)
    }

    pub fn iter(&self) -> impl Iterator<Item = Op> + '_ {
        self.ops.iter().copied()
    }
}

impl fmt::Display for OpSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in self.ops.iter() {
            write!(f, "{}", op.symbol())?;
        }
        Ok(())
    }
}

/// One IR instruction. Nets are value records: rewriting a net means building
/// a new one and installing it in place of the old one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Net {
    pub op: Op,
    pub params: Option<Vec<usize>>,
    pub args: Vec<WireRef>,
    pub dests: Vec<WireRef>,
}

impl Net {
    pub fn new(op: Op, args: Vec<WireRef>, dest: WireRef) -> Self {
        Self {
            op,
            params: None,
            args,
            dests: vec![dest],
        }
    }

    pub fn select(arg: WireRef, indices: Vec<usize>, dest: WireRef) -> Self {
        Self {
            op: Op::Select,
            params: Some(indices),
            args: vec![arg],
            dests: vec![dest],
        }
    }

    /// Every net handled by the passes has exactly one destination.
    pub fn dest(&self) -> WireRef {
        self.dests[0]
    }

    /// Returns a copy of this net reading from `args` instead.
    #[must_use]
    pub fn with_args(&self, args: Vec<WireRef>) -> Self {
        Self {
            op: self.op,
            params: self.params.clone(),
            args,
            dests: self.dests.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_round_trip() {
        for op in ALL_OPS {
            assert_eq!(Op::from_symbol(op.symbol()), Some(op));
            assert_eq!(Op::from_name(op.name()), Some(op));
        }
        assert_eq!(Op::from_symbol('x'), None);
    }

    #[test]
    fn test_synthesized_alphabet() {
        let narrow = OpSet::synthesized();
        assert_eq!(narrow, OpSet::from_symbols("~&|^rw").unwrap());
        assert!(narrow.is_subset(&OpSet::all()));
        assert!(!narrow.contains(Op::Add));
        assert!(OpSet::from_symbols("&q").is_err());
    }

    #[test]
    fn test_with_args_keeps_dest_and_params() {
        let net = Net::select(WireRef { id: 1 }, vec![0, 0], WireRef { id: 2 });
        let rewritten = net.with_args(vec![WireRef { id: 7 }]);
        assert_eq!(rewritten.args, vec![WireRef { id: 7 }]);
        assert_eq!(rewritten.dest(), WireRef { id: 2 });
        assert_eq!(rewritten.params, Some(vec![0, 0]));
    }
}
