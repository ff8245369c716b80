// SPDX-License-Identifier: Apache-2.0

use clap::ArgMatches;
use netsynth::summary_stats::get_summary_stats;

use crate::common::{input_path, read_netlist};
use crate::report_cli_error::report_error_chain_and_exit;

fn stats(matches: &ArgMatches) -> anyhow::Result<()> {
    let netlist = read_netlist(input_path(matches))?;
    let stats = get_summary_stats(&netlist);
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

pub fn handle_stats(matches: &ArgMatches) {
    if let Err(e) = stats(matches) {
        report_error_chain_and_exit(&e, "stats");
    }
}
