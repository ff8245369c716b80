// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use anyhow::Context;
use clap::ArgMatches;
use netsynth::netlist::serdes::{from_json, to_json};
use netsynth::Netlist;

pub fn read_netlist(path: &Path) -> anyhow::Result<Netlist> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading netlist file {}", path.display()))?;
    let netlist =
        from_json(&text).with_context(|| format!("loading netlist from {}", path.display()))?;
    log::info!(
        "loaded netlist '{}' with {} wires and {} nets from {}",
        netlist.name,
        netlist.wire_count(),
        netlist.nets().len(),
        path.display()
    );
    Ok(netlist)
}

/// Writes `netlist` as JSON to the `output` flag's path, or to stdout when the
/// flag is absent.
pub fn write_netlist(matches: &ArgMatches, netlist: &Netlist) -> anyhow::Result<()> {
    let text = to_json(netlist)?;
    match matches.get_one::<String>("output") {
        Some(path) => {
            std::fs::write(path, text + "\n").with_context(|| format!("writing {}", path))?;
            log::info!("wrote netlist '{}' to {}", netlist.name, path);
        }
        None => println!("{}", text),
    }
    Ok(())
}

pub fn input_path(matches: &ArgMatches) -> &Path {
    // The argument is declared `required`, so clap has already rejected its
    // absence.
    Path::new(
        matches
            .get_one::<String>("netlist_input_file")
            .map(|s| s.as_str())
            .unwrap_or_default(),
    )
}
