// SPDX-License-Identifier: Apache-2.0

//! Optional `netsynth.toml` configuration. Command line flags take precedence
//! over values given here.
//!
//! ```toml
//! [synthesize]
//! adder_mapping = "iterative"
//! recursive_adder_max_width = 64
//!
//! [optimize]
//! after_synthesize = true
//! ```

use clap::ArgMatches;
use netsynth::synth_utils::AdderMapping;
use netsynth::SynthOptions;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SynthesizeConfig {
    /// Either "recursive" or "iterative".
    pub adder_mapping: Option<String>,

    /// Adders wider than this are built iteratively.
    pub recursive_adder_max_width: Option<usize>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OptimizeConfig {
    /// Run the optimizer on the output of `synthesize`.
    pub after_synthesize: Option<bool>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DriverConfig {
    pub synthesize: Option<SynthesizeConfig>,
    pub optimize: Option<OptimizeConfig>,
}

impl DriverConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Resolves synthesis options from the flags, falling back to the config file
/// and then to the library defaults.
pub fn get_synth_options(
    matches: &ArgMatches,
    config: &Option<DriverConfig>,
) -> anyhow::Result<SynthOptions> {
    let synth_config = config.as_ref().and_then(|c| c.synthesize.as_ref());
    let mut options = SynthOptions::default();

    let adder_mapping = matches
        .get_one::<String>("adder_mapping")
        .cloned()
        .or_else(|| synth_config.and_then(|c| c.adder_mapping.clone()));
    if let Some(text) = adder_mapping {
        options.adder_mapping = text
            .parse::<AdderMapping>()
            .map_err(anyhow::Error::msg)?;
    }

    let max_width = matches
        .get_one::<String>("recursive_adder_max_width")
        .map(|s| {
            s.parse::<usize>().map_err(|e| {
                anyhow::anyhow!("invalid --recursive_adder_max_width '{}': {}", s, e)
            })
        })
        .transpose()?
        .or_else(|| synth_config.and_then(|c| c.recursive_adder_max_width));
    if let Some(max_width) = max_width {
        options.recursive_adder_max_width = max_width;
    }
    Ok(options)
}

/// Whether to optimize after synthesizing: flag, then config, then `false`.
pub fn get_optimize_after_synthesize(matches: &ArgMatches, config: &Option<DriverConfig>) -> bool {
    match matches.get_one::<String>("optimize").map(|s| s.as_str()) {
        Some("true") => true,
        Some("false") => false,
        _ => config
            .as_ref()
            .and_then(|c| c.optimize.as_ref())
            .and_then(|o| o.after_synthesize)
            .unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_config() {
        let config = DriverConfig::from_toml_str(
            r#"
[synthesize]
adder_mapping = "iterative"
recursive_adder_max_width = 64

[optimize]
after_synthesize = true
"#,
        )
        .unwrap();
        assert_eq!(
            config,
            DriverConfig {
                synthesize: Some(SynthesizeConfig {
                    adder_mapping: Some("iterative".to_string()),
                    recursive_adder_max_width: Some(64),
                }),
                optimize: Some(OptimizeConfig {
                    after_synthesize: Some(true),
                }),
            }
        );
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(DriverConfig::from_toml_str("").unwrap(), DriverConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(DriverConfig::from_toml_str("[synthesize]\nfast = true\n").is_err());
    }
}
