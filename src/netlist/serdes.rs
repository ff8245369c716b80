// SPDX-License-Identifier: Apache-2.0

//! JSON interchange for netlists. Nets refer to wires by name, so a document
//! can be written by hand.
//!
//! ```json
//! {
//!   "name": "inv",
//!   "legal_ops": "w~&|^r",
//!   "wires": [
//!     {"name": "a", "bit_count": 1, "kind": "input"},
//!     {"name": "o", "bit_count": 1, "kind": "output"}
//!   ],
//!   "nets": [{"op": "not", "args": ["a"], "dests": ["o"]}]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::bits::Bits;
use crate::netlist::net::{Net, Op, OpSet};
use crate::netlist::wire::{WireKind, WireRef};
use crate::netlist::Netlist;
use crate::netsynth_error::NetsynthError;

#[derive(Debug, Serialize, Deserialize)]
struct WireDoc {
    name: String,
    bit_count: usize,
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NetDoc {
    op: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    params: Option<Vec<usize>>,
    args: Vec<String>,
    dests: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NetlistDoc {
    name: String,
    #[serde(default)]
    legal_ops: Option<String>,
    wires: Vec<WireDoc>,
    nets: Vec<NetDoc>,
}

pub fn to_json(netlist: &Netlist) -> Result<String, NetsynthError> {
    let wire_name = |w: &WireRef| -> Result<String, NetsynthError> {
        netlist
            .try_get_wire(*w)
            .map(|wire| wire.name.clone())
            .ok_or_else(|| {
                NetsynthError::InternalConsistency(format!(
                    "net refers to removed wire %{}",
                    w.id
                ))
            })
    };
    let wires = netlist
        .wire_refs()
        .map(|w| {
            let wire = netlist.get_wire(w);
            WireDoc {
                name: wire.name.clone(),
                bit_count: wire.bit_count,
                kind: wire.kind.keyword().to_string(),
                value: wire.const_value().map(|v| v.to_string()),
            }
        })
        .collect();
    let mut nets = Vec::with_capacity(netlist.nets().len());
    for net in netlist.nets() {
        nets.push(NetDoc {
            op: net.op.name().to_string(),
            params: net.params.clone(),
            args: net.args.iter().map(&wire_name).collect::<Result<_, _>>()?,
            dests: net.dests.iter().map(&wire_name).collect::<Result<_, _>>()?,
        });
    }
    let doc = NetlistDoc {
        name: netlist.name.clone(),
        legal_ops: Some(netlist.legal_ops().to_string()),
        wires,
        nets,
    };
    serde_json::to_string_pretty(&doc)
        .map_err(|e| NetsynthError::InternalConsistency(format!("serializing netlist: {}", e)))
}

fn parse_kind(wire: &WireDoc) -> Result<WireKind, NetsynthError> {
    let kind = match wire.kind.as_str() {
        "wire" => WireKind::Plain,
        "input" => WireKind::Input,
        "output" => WireKind::Output,
        "reg" => WireKind::Register,
        "const" => {
            let text = wire.value.as_deref().ok_or_else(|| {
                NetsynthError::Parse(format!("constant wire '{}' has no value", wire.name))
            })?;
            let value = Bits::parse(text, wire.bit_count).map_err(|e| {
                NetsynthError::Parse(format!("constant wire '{}': {}", wire.name, e))
            })?;
            WireKind::Const(value)
        }
        other => {
            return Err(NetsynthError::Parse(format!(
                "wire '{}' has unknown kind '{}'",
                wire.name, other
            )))
        }
    };
    Ok(kind)
}

/// Rebuilds a netlist from its JSON form. Only name resolution is checked;
/// call `sanity_check` for structural validation.
pub fn from_json(text: &str) -> Result<Netlist, NetsynthError> {
    let doc: NetlistDoc =
        serde_json::from_str(text).map_err(|e| NetsynthError::Parse(e.to_string()))?;
    let legal_ops = match &doc.legal_ops {
        Some(symbols) => OpSet::from_symbols(symbols).map_err(NetsynthError::Parse)?,
        None => OpSet::all(),
    };
    let mut netlist = Netlist::with_legal_ops(&doc.name, legal_ops);
    for wire in doc.wires.iter() {
        let kind = parse_kind(wire)?;
        netlist.add_wire(&wire.name, wire.bit_count, kind)?;
    }
    let resolve = |netlist: &Netlist, name: &String| {
        netlist
            .wire_by_name(name)
            .ok_or_else(|| NetsynthError::Parse(format!("net refers to unknown wire '{}'", name)))
    };
    let mut nets = Vec::with_capacity(doc.nets.len());
    for net in doc.nets.iter() {
        let op = Op::from_name(&net.op)
            .ok_or_else(|| NetsynthError::Parse(format!("unknown op '{}'", net.op)))?;
        let args = net
            .args
            .iter()
            .map(|a| resolve(&netlist, a))
            .collect::<Result<Vec<WireRef>, NetsynthError>>()?;
        let dests = net
            .dests
            .iter()
            .map(|d| resolve(&netlist, d))
            .collect::<Result<Vec<WireRef>, NetsynthError>>()?;
        nets.push(Net {
            op,
            params: net.params.clone(),
            args,
            dests,
        });
    }
    netlist.set_nets(nets);
    Ok(netlist)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_hand_written_document() {
        let text = r#"{
            "name": "masked",
            "wires": [
                {"name": "a", "bit_count": 2, "kind": "input"},
                {"name": "mask", "bit_count": 2, "kind": "const", "value": "0b10"},
                {"name": "o", "bit_count": 2, "kind": "output"}
            ],
            "nets": [{"op": "and", "args": ["a", "mask"], "dests": ["o"]}]
        }"#;
        let n = from_json(text).unwrap();
        assert_eq!(n.legal_ops(), &OpSet::all());
        assert_eq!(n.sanity_check(), Ok(()));
        let mask = n.wire_by_name("mask").unwrap();
        assert_eq!(n.get_wire(mask).const_value().unwrap().to_u64(), Some(2));
    }

    #[test]
    fn test_unknown_wire_reference() {
        let text = r#"{"name": "x", "wires": [], "nets": [{"op": "not", "args": ["a"], "dests": ["b"]}]}"#;
        assert_eq!(
            from_json(text).unwrap_err(),
            NetsynthError::Parse("net refers to unknown wire 'a'".to_string())
        );
    }

    #[test]
    fn test_zero_width_wire_rejected_on_load() {
        let text = r#"{
            "name": "x",
            "wires": [{"name": "a", "bit_count": 0, "kind": "input"}],
            "nets": []
        }"#;
        assert!(matches!(from_json(text), Err(NetsynthError::Usage(_))));
    }

    #[test]
    fn test_unknown_op() {
        let text = r#"{"name": "x", "wires": [], "nets": [{"op": "mul", "args": [], "dests": []}]}"#;
        assert!(matches!(from_json(text), Err(NetsynthError::Parse(_))));
    }

    #[test]
    fn test_written_document_reloads_equal() {
        let mut n = Netlist::with_legal_ops("sel", OpSet::all());
        let a = n.add_input("a", 3).unwrap();
        let k = n.add_const(Bits::make_ubits(2, 1).unwrap()).unwrap();
        let t = n.add_wire("t", 2, WireKind::Plain).unwrap();
        let o = n.add_output("o", 2).unwrap();
        n.add_net(Net::select(a, vec![2, 0], t)).unwrap();
        n.add_net(Net::new(Op::Xor, vec![t, k], o)).unwrap();
        let text = to_json(&n).unwrap();
        let reloaded = from_json(&text).unwrap();
        assert_eq!(reloaded.to_string(), n.to_string());
    }
}
