//! Ops backing the relay object the surface exposes to the script context

use bridge_relay::RelayHandle;
use deno_core::OpState;
use deno_core::op2;
use log::debug;

/// Relay entry point: one console line from the hosted script
#[op2(fast)]
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn op_show_log(state: &mut OpState, #[string] message: String) {
    let relay = state.borrow::<RelayHandle>();
    relay.show_log(message);
}

/// Pass-through target of the console shim; the surface's native console
#[op2(fast)]
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn op_console_passthrough(state: &mut OpState, #[string] message: String) {
    let relay = state.borrow::<RelayHandle>();
    debug!(target: "tutorjs::console", "[session {}] {message}", relay.session());
}
