// SPDX-License-Identifier: Apache-2.0

//! Signal nodes: named, fixed-width buses.

use crate::bits::Bits;

/// Stable handle for a wire in its owning `Netlist`'s arena. Handles are never
/// reused after the wire is removed.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct WireRef {
    pub id: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireKind {
    Plain,
    Input,
    Output,
    Const(Bits),
    Register,
}

impl WireKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            WireKind::Plain => "wire",
            WireKind::Input => "input",
            WireKind::Output => "output",
            WireKind::Const(_) => "const",
            WireKind::Register => "reg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wire {
    pub name: String,
    pub bit_count: usize,
    pub kind: WireKind,
}

impl Wire {
    pub fn is_input(&self) -> bool {
        matches!(self.kind, WireKind::Input)
    }

    pub fn is_output(&self) -> bool {
        matches!(self.kind, WireKind::Output)
    }

    pub fn is_const(&self) -> bool {
        matches!(self.kind, WireKind::Const(_))
    }

    pub fn is_register(&self) -> bool {
        matches!(self.kind, WireKind::Register)
    }

    /// Inputs and constants are the only wires that need no producing net.
    pub fn is_source(&self) -> bool {
        self.is_input() || self.is_const()
    }

    pub fn const_value(&self) -> Option<&Bits> {
        match &self.kind {
            WireKind::Const(value) => Some(value),
            _ => None,
        }
    }
}

impl std::fmt::Display for Wire {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}: bits[{}]",
            self.kind.keyword(),
            self.name,
            self.bit_count
        )?;
        if let WireKind::Const(value) = &self.kind {
            write!(f, " = {}", value)?;
        }
        Ok(())
    }
}
