// SPDX-License-Identifier: Apache-2.0

//! Lowers a netlist to the single-bit gate basis, optionally optimizing the
//! result.

use clap::ArgMatches;

use crate::common::{input_path, read_netlist, write_netlist};
use crate::driver_config::{get_optimize_after_synthesize, get_synth_options, DriverConfig};
use crate::report_cli_error::report_error_chain_and_exit;

fn synthesize(matches: &ArgMatches, config: &Option<DriverConfig>) -> anyhow::Result<()> {
    let options = get_synth_options(matches, config)?;
    log::info!(
        "synthesize options: adder mapping {}, recursion bound {}",
        options.adder_mapping,
        options.recursive_adder_max_width
    );
    let mut netlist = read_netlist(input_path(matches))?;
    netsynth::synthesize_in_place(&mut netlist, &options)?;
    if get_optimize_after_synthesize(matches, config) {
        let report = netsynth::optimize_in_place(&mut netlist)?;
        log::info!("post-synthesis optimization: {:?}", report);
    }
    write_netlist(matches, &netlist)
}

pub fn handle_synthesize(matches: &ArgMatches, config: &Option<DriverConfig>) {
    log::info!("handle_synthesize");
    if let Err(e) = synthesize(matches, config) {
        report_error_chain_and_exit(&e, "synthesize");
    }
}
