// SPDX-License-Identifier: Apache-2.0

use crate::netlist::Netlist;
use crate::netsynth_error::NetsynthError;

/// Area estimate for a synthesized netlist at the given process node.
///
/// There is no cost model; this always reports `NotImplemented` rather than a
/// number.
pub fn area_estimation(netlist: &Netlist, tech_in_nm: u32) -> Result<f64, NetsynthError> {
    log::debug!(
        "area_estimation requested for '{}' at {}nm",
        netlist.name,
        tech_in_nm
    );
    Err(NetsynthError::NotImplemented(format!(
        "area estimation for '{}' at {}nm",
        netlist.name, tech_in_nm
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_estimation_is_not_implemented() {
        let n = Netlist::new("empty");
        assert!(matches!(
            area_estimation(&n, 130),
            Err(NetsynthError::NotImplemented(_))
        ));
    }
}
