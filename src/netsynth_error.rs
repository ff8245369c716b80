// SPDX-License-Identifier: Apache-2.0

use crate::netlist::validate::ValidationError;

/// Errors surfaced by netlist construction and the transformation passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetsynthError {
    /// The caller invoked a pass on a netlist that violates one of its
    /// preconditions; nothing was mutated.
    Usage(String),
    /// A pass encountered a net it was not built to handle, which indicates a
    /// defect in a prior pass or a malformed netlist.
    InternalConsistency(String),
    /// Structural validation of a netlist failed.
    Validation(ValidationError),
    /// A wire with this name is already registered in the netlist.
    DuplicateWireName(String),
    /// The requested facility is declared but intentionally unimplemented.
    NotImplemented(String),
    /// Interchange text could not be turned into a netlist.
    Parse(String),
}

impl std::fmt::Display for NetsynthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetsynthError::Usage(msg) => write!(f, "usage error: {}", msg),
            NetsynthError::InternalConsistency(msg) => {
                write!(f, "internal consistency error: {}", msg)
            }
            NetsynthError::Validation(e) => write!(f, "netlist validation failed: {}", e),
            NetsynthError::DuplicateWireName(name) => {
                write!(f, "wire name '{}' is already in use", name)
            }
            NetsynthError::NotImplemented(what) => write!(f, "not implemented: {}", what),
            NetsynthError::Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for NetsynthError {}

impl From<ValidationError> for NetsynthError {
    fn from(e: ValidationError) -> Self {
        NetsynthError::Validation(e)
    }
}
