// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use std::collections::HashMap;

use netsynth::sim::Simulator;
use netsynth::synthesize::SynthOutput;
use netsynth::{Bits, Netlist};
use rand::Rng;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn random_bits<R: Rng>(rng: &mut R, bit_count: usize) -> Bits {
    let bits: Vec<bool> = (0..bit_count).map(|_| rng.gen()).collect();
    Bits::from_lsb_is_0(&bits)
}

pub fn random_inputs<R: Rng>(rng: &mut R, netlist: &Netlist) -> HashMap<String, Bits> {
    netlist
        .inputs()
        .into_iter()
        .map(|w| {
            let wire = netlist.get_wire(w);
            (wire.name.clone(), random_bits(rng, wire.bit_count))
        })
        .collect()
}

/// Splits source-level input values into the per-bit inputs of the
/// synthesized netlist.
pub fn expand_inputs(
    src: &Netlist,
    out: &SynthOutput,
    inputs: &HashMap<String, Bits>,
) -> HashMap<String, Bits> {
    let mut expanded = HashMap::new();
    for w in src.inputs() {
        let wire = src.get_wire(w);
        let value = &inputs[&wire.name];
        for i in 0..wire.bit_count {
            let bit_wire = out.netlist.get_wire(out.wire_map[&(w, i)]);
            expanded.insert(bit_wire.name.clone(), Bits::bool(value.get_bit(i)));
        }
    }
    expanded
}

/// Reassembles the per-bit outputs of the synthesized netlist into
/// source-level output values.
pub fn collect_outputs(
    src: &Netlist,
    out: &SynthOutput,
    bit_outputs: &HashMap<String, Bits>,
) -> HashMap<String, Bits> {
    src.outputs()
        .into_iter()
        .map(|w| {
            let wire = src.get_wire(w);
            let bits: Vec<bool> = (0..wire.bit_count)
                .map(|i| {
                    let name = &out.netlist.get_wire(out.wire_map[&(w, i)]).name;
                    bit_outputs[name].get_bit(0)
                })
                .collect();
            (wire.name.clone(), Bits::from_lsb_is_0(&bits))
        })
        .collect()
}

/// Drives `src` and its synthesized form with the same random stimulus for
/// `cycles` cycles and checks every output matches bit-for-bit.
pub fn assert_synth_equivalent<R: Rng>(src: &Netlist, out: &SynthOutput, rng: &mut R, cycles: usize) {
    let mut src_sim = Simulator::new(src).unwrap();
    let mut out_sim = Simulator::new(&out.netlist).unwrap();
    for cycle in 0..cycles {
        let inputs = random_inputs(rng, src);
        let want = src_sim.step(&inputs).unwrap();
        let got = out_sim.step(&expand_inputs(src, out, &inputs)).unwrap();
        let got = collect_outputs(src, out, &got);
        assert_eq!(want, got, "cycle {} inputs {:?}", cycle, inputs);
    }
}

/// Checks two netlists with the same Input and Output names agree over
/// random stimulus. The first `warmup` cycles are driven but not compared.
pub fn assert_same_behavior<R: Rng>(
    lhs: &Netlist,
    rhs: &Netlist,
    rng: &mut R,
    warmup: usize,
    cycles: usize,
) {
    let mut lhs_sim = Simulator::new(lhs).unwrap();
    let mut rhs_sim = Simulator::new(rhs).unwrap();
    for cycle in 0..warmup + cycles {
        let inputs = random_inputs(rng, lhs);
        let want = lhs_sim.step(&inputs).unwrap();
        let got = rhs_sim.step(&inputs).unwrap();
        if cycle >= warmup {
            assert_eq!(want, got, "cycle {} inputs {:?}", cycle, inputs);
        }
    }
}
