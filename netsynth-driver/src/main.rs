// SPDX-License-Identifier: Apache-2.0

//! Command line driver for the netsynth passes.
//!
//! Netlists are read and written in the JSON interchange form. Commands are
//! given like:
//!
//! ```text
//! netsynth-driver <global-options> <command> <command-args-and-options>
//! ```
//!
//! Commands are:
//!
//! - synthesize: Lowers a netlist to the single-bit gate basis.
//! - optimize: Removes copy nets and propagates constants in a gate-basis
//!   netlist.
//! - stats: Prints summary statistics as JSON.
//! - area: Area estimation (not implemented; always fails).
//!
//! Sample usage:
//!
//! ```shell
//! $ cargo run -- --config=$HOME/netsynth.toml \
//!     synthesize adder.json --output adder_gates.json --optimize true
//! $ cargo run -- stats adder_gates.json
//! ```

mod area;
mod common;
mod driver_config;
mod optimize;
mod report_cli_error;
mod stats;
mod synthesize;

use clap::{Arg, ArgAction};
use once_cell::sync::Lazy;

use crate::driver_config::DriverConfig;
use report_cli_error::report_cli_error_and_exit;

static DEFAULT_ADDER_MAPPING: Lazy<String> =
    Lazy::new(|| netsynth::synth_utils::AdderMapping::default().to_string());

trait AppExt {
    fn add_netlist_input_arg(self) -> Self;
    fn add_output_arg(self) -> Self;
    fn add_bool_arg(self, long: &'static str, help: &'static str) -> Self;
    fn add_synth_flags(self) -> Self;
}

impl AppExt for clap::Command {
    fn add_netlist_input_arg(self) -> Self {
        (self as clap::Command).arg(
            Arg::new("netlist_input_file")
                .value_name("NETLIST_JSON")
                .help("The input netlist (JSON)")
                .required(true)
                .index(1),
        )
    }

    fn add_output_arg(self) -> Self {
        (self as clap::Command).arg(
            Arg::new("output")
                .long("output")
                .value_name("PATH")
                .help("Write the resulting netlist to PATH instead of stdout")
                .action(ArgAction::Set),
        )
    }

    fn add_bool_arg(self, long: &'static str, help: &'static str) -> Self {
        (self as clap::Command).arg(
            Arg::new(long)
                .long(long)
                .value_name("BOOL")
                .action(ArgAction::Set)
                .value_parser(["true", "false"])
                .num_args(1)
                .help(help),
        )
    }

    fn add_synth_flags(self) -> Self {
        (self as clap::Command)
            .arg(
                Arg::new("adder_mapping")
                    .long("adder_mapping")
                    .value_name("ADDER_MAPPING")
                    .help(format!(
                        "The ripple-carry adder generator to use (default: {})",
                        DEFAULT_ADDER_MAPPING.as_str()
                    ))
                    .value_parser(["recursive", "iterative"])
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("recursive_adder_max_width")
                    .long("recursive_adder_max_width")
                    .value_name("WIDTH")
                    .help("Adders wider than this are generated iteratively")
                    .action(ArgAction::Set),
            )
            .add_bool_arg("optimize", "Optimize the synthesized netlist")
    }
}

fn load_config(path: &str) -> DriverConfig {
    if !std::path::Path::new(path).exists() {
        let cwd = std::env::current_dir()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|_| "<unknown>".to_string());
        report_cli_error_and_exit(
            "config toml file does not exist",
            None,
            vec![("path", path), ("working directory", &cwd)],
        );
    }
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => report_cli_error_and_exit(
            "could not read config toml file",
            None,
            vec![("path", path), ("error", &e.to_string())],
        ),
    };
    match DriverConfig::from_toml_str(&text) {
        Ok(config) => config,
        Err(e) => report_cli_error_and_exit(
            "could not parse config toml file",
            None,
            vec![("path", path), ("error", &e.to_string())],
        ),
    }
}

fn main() {
    let _ = env_logger::try_init();

    log::info!(
        "netsynth-driver starting; version: {}",
        env!("CARGO_PKG_VERSION")
    );

    let matches = clap::Command::new("netsynth-driver")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Command line driver for netlist optimization and gate synthesis")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("CONFIG")
                .help("Path to a netsynth.toml file")
                .action(ArgAction::Set),
        )
        .subcommand(clap::Command::new("version").about("Prints the version of the driver"))
        .subcommand(
            clap::Command::new("synthesize")
                .about("Lowers a netlist to single-bit not/and/or/xor/reg gates")
                .add_netlist_input_arg()
                .add_output_arg()
                .add_synth_flags(),
        )
        .subcommand(
            clap::Command::new("optimize")
                .about("Removes copy nets and propagates constants in a gate-basis netlist")
                .add_netlist_input_arg()
                .add_output_arg(),
        )
        .subcommand(
            clap::Command::new("stats")
                .about("Prints summary statistics for a netlist as JSON")
                .add_netlist_input_arg(),
        )
        .subcommand(
            clap::Command::new("area")
                .about("Estimates the area of a synthesized netlist")
                .add_netlist_input_arg()
                .arg(
                    Arg::new("tech_nm")
                        .long("tech_nm")
                        .value_name("NM")
                        .help("Process node in nanometers (default: 130)")
                        .action(ArgAction::Set),
                ),
        )
        .get_matches();

    let config = matches
        .get_one::<String>("config")
        .map(|path| load_config(path));

    if let Some(matches) = matches.subcommand_matches("synthesize") {
        synthesize::handle_synthesize(matches, &config);
    } else if let Some(matches) = matches.subcommand_matches("optimize") {
        optimize::handle_optimize(matches, &config);
    } else if let Some(matches) = matches.subcommand_matches("stats") {
        stats::handle_stats(matches);
    } else if let Some(matches) = matches.subcommand_matches("area") {
        area::handle_area(matches);
    } else if let Some(_matches) = matches.subcommand_matches("version") {
        println!("{}", env!("CARGO_PKG_VERSION"));
    } else {
        report_cli_error_and_exit("No valid subcommand provided.", None, vec![]);
    }
}
