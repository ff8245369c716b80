// SPDX-License-Identifier: Apache-2.0

//! Process-wide default netlist for callers that want an implicit working
//! context. The passes themselves always take their netlist explicitly; only
//! the `*_working` wrappers here read this handle.

use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;

use crate::netlist::Netlist;
use crate::netsynth_error::NetsynthError;
use crate::optimize::{optimize, OptimizeReport};
use crate::synthesize::{synthesize, SynthOptions};

static WORKING_NETLIST: Lazy<Mutex<Option<Netlist>>> = Lazy::new(|| Mutex::new(None));

fn lock() -> MutexGuard<'static, Option<Netlist>> {
    // Updates are whole-value swaps, so a poisoned value is still consistent.
    WORKING_NETLIST
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Installs `netlist` as the working netlist, returning the previous one.
pub fn set_working_netlist(netlist: Netlist) -> Option<Netlist> {
    lock().replace(netlist)
}

/// Removes and returns the working netlist.
pub fn take_working_netlist() -> Option<Netlist> {
    lock().take()
}

pub fn working_netlist_snapshot() -> Option<Netlist> {
    lock().as_ref().cloned()
}

fn no_working_netlist() -> NetsynthError {
    NetsynthError::Usage("no working netlist has been set".to_string())
}

/// Optimizes the working netlist. With `update_working` the result replaces
/// it; otherwise it is left untouched. The optimized netlist is returned either
/// way.
pub fn optimize_working(update_working: bool) -> Result<(Netlist, OptimizeReport), NetsynthError> {
    let mut guard = lock();
    let current = guard.as_ref().ok_or_else(no_working_netlist)?;
    let (optimized, report) = optimize(current)?;
    if update_working {
        *guard = Some(optimized.clone());
    }
    Ok((optimized, report))
}

/// Synthesizes the working netlist, with the same update semantics as
/// `optimize_working`.
pub fn synthesize_working(
    update_working: bool,
    options: &SynthOptions,
) -> Result<Netlist, NetsynthError> {
    let mut guard = lock();
    let current = guard.as_ref().ok_or_else(no_working_netlist)?;
    let synthesized = synthesize(current, options)?.netlist;
    if update_working {
        *guard = Some(synthesized.clone());
    }
    Ok(synthesized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist::net::{Net, Op, OpSet};

    // The handle is process-wide, so everything touching it lives in this one
    // test.
    #[test]
    fn test_working_netlist_lifecycle() {
        let _ = take_working_netlist();
        assert!(matches!(
            optimize_working(true),
            Err(NetsynthError::Usage(_))
        ));

        let mut n = Netlist::new("w");
        let a = n.add_input("a", 2).unwrap();
        let b = n.add_input("b", 2).unwrap();
        let o = n.add_output("o", 3).unwrap();
        n.add_net(Net::new(Op::Add, vec![a, b], o)).unwrap();
        assert!(set_working_netlist(n).is_none());

        // Not in the gate basis yet; the working netlist stays as it was.
        assert!(matches!(
            optimize_working(true),
            Err(NetsynthError::Usage(_))
        ));
        assert_eq!(
            working_netlist_snapshot().unwrap().nets()[0].op,
            Op::Add
        );

        let preview = synthesize_working(false, &SynthOptions::default()).unwrap();
        assert_eq!(preview.legal_ops(), &OpSet::synthesized());
        assert_eq!(working_netlist_snapshot().unwrap().legal_ops(), &OpSet::all());

        synthesize_working(true, &SynthOptions::default()).unwrap();
        let (optimized, _) = optimize_working(true).unwrap();
        let current = take_working_netlist().unwrap();
        assert_eq!(current.to_string(), optimized.to_string());
        assert!(current.nets().iter().all(|n| n.op != Op::Add));
    }
}
