// SPDX-License-Identifier: Apache-2.0

use anyhow::Context;
use clap::ArgMatches;
use netsynth::area_estimation::area_estimation;

use crate::common::{input_path, read_netlist};
use crate::report_cli_error::report_error_chain_and_exit;

fn area(matches: &ArgMatches) -> anyhow::Result<()> {
    let tech_nm = matches
        .get_one::<String>("tech_nm")
        .map(|s| s.as_str())
        .unwrap_or("130");
    let tech_nm: u32 = tech_nm
        .parse()
        .with_context(|| format!("invalid --tech_nm '{}'", tech_nm))?;
    let netlist = read_netlist(input_path(matches))?;
    let area = area_estimation(&netlist, tech_nm)?;
    println!("{}", area);
    Ok(())
}

pub fn handle_area(matches: &ArgMatches) {
    if let Err(e) = area(matches) {
        report_error_chain_and_exit(&e, "area");
    }
}
