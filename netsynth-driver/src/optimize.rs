// SPDX-License-Identifier: Apache-2.0

//! Reads a netlist in the gate basis and writes its optimized form.

use clap::ArgMatches;

use crate::common::{input_path, read_netlist, write_netlist};
use crate::driver_config::DriverConfig;
use crate::report_cli_error::report_error_chain_and_exit;

fn optimize(matches: &ArgMatches) -> anyhow::Result<()> {
    let mut netlist = read_netlist(input_path(matches))?;
    let report = netsynth::optimize_in_place(&mut netlist)?;
    eprintln!(
        "removed {} copy nets; rewrote {} nets in {} constant-propagation passes",
        report.copies_removed, report.const_prop.nets_rewritten, report.const_prop.passes
    );
    for input in report.const_prop.eliminated_inputs.iter() {
        eprintln!("warning: input '{}' no longer affects any output", input);
    }
    write_netlist(matches, &netlist)
}

pub fn handle_optimize(matches: &ArgMatches, _config: &Option<DriverConfig>) {
    log::info!("handle_optimize");
    if let Err(e) = optimize(matches) {
        report_error_chain_and_exit(&e, "optimize");
    }
}
