//! Structured query tracing for `TraitSolver::query`.
//!
//! Events use target `cxxtraits::query_json` and are intended to be consumed
//! with: `CXXTRAITS_LOG=cxxtraits::query_json=trace CXXTRAITS_LOG_FORMAT=json`.
//!
//! Environment:
//! - `CXXTRAITS_QUERY_RUN_ID`: optional run identifier attached to every event.

use crate::types::TypeId;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Level, trace};

static NEXT_QUERY_ID: AtomicU64 = AtomicU64::new(1);
static QUERY_RUN_ID: OnceLock<String> = OnceLock::new();

#[inline]
pub(crate) fn enabled() -> bool {
    tracing::enabled!(target: "cxxtraits::query_json", Level::TRACE)
}

#[inline]
pub(crate) fn next_query_id() -> u64 {
    NEXT_QUERY_ID.fetch_add(1, Ordering::Relaxed)
}

#[inline]
fn run_id() -> &'static str {
    QUERY_RUN_ID
        .get_or_init(|| {
            std::env::var("CXXTRAITS_QUERY_RUN_ID").unwrap_or_else(|_| "default".to_string())
        })
        .as_str()
}

#[inline]
pub(crate) fn query_start(query_id: u64, op: &'static str, input: TypeId, args: &[TypeId]) {
    trace!(
        target: "cxxtraits::query_json",
        event = "query",
        phase = "start",
        run_id = run_id(),
        query_id,
        op,
        input_type_id = input.0,
        arg_type_ids = ?args.iter().map(|arg| arg.0).collect::<Vec<_>>()
    );
}

#[inline]
pub(crate) fn query_end(query_id: u64, op: &'static str, answer: &str, cache_hit: bool) {
    trace!(
        target: "cxxtraits::query_json",
        event = "query",
        phase = "end",
        run_id = run_id(),
        query_id,
        op,
        answer,
        cache_hit
    );
}

#[inline]
pub(crate) fn query_rejected(query_id: u64, op: &'static str, reason: &str) {
    trace!(
        target: "cxxtraits::query_json",
        event = "query",
        phase = "rejected",
        run_id = run_id(),
        query_id,
        op,
        reason
    );
}
