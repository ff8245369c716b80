// SPDX-License-Identifier: Apache-2.0

//! Netlist transformation passes: dead pass-through removal, fixpoint
//! constant propagation, and lowering to a single-bit gate basis.

pub mod area_estimation;
pub mod bits;
pub mod gate_builder;
pub mod netlist;
pub mod netsynth_error;
pub mod optimize;
pub mod sim;
pub mod summary_stats;
pub mod synth_utils;
pub mod synthesize;
pub mod use_count;
pub mod working_netlist;

pub use bits::Bits;
pub use netlist::net::{Net, Op, OpSet};
pub use netlist::wire::{Wire, WireKind, WireRef};
pub use netlist::Netlist;
pub use netsynth_error::NetsynthError;
pub use optimize::{optimize, optimize_in_place, OptimizeReport};
pub use synthesize::{synthesize, synthesize_in_place, SynthOptions, SynthOutput};
