//! Tracing configuration for inspecting how traits are decided.
//!
//! Supports three output formats controlled by `CXXTRAITS_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`
//! - `json`: One JSON object per span/event, machine-readable
//!
//! ## Quick start
//!
//! ```bash
//! # Which traits fell back to their portable formulation
//! CXXTRAITS_LOG=cxxtraits_solver=trace CXXTRAITS_LOG_FORMAT=tree cargo test
//!
//! # Every query as a JSON event, tagged with a run id
//! CXXTRAITS_LOG=cxxtraits::query_json=trace CXXTRAITS_LOG_FORMAT=json \
//!     CXXTRAITS_QUERY_RUN_ID=nightly cargo test
//!
//! # Plain text
//! CXXTRAITS_LOG=debug cargo test
//! ```
//!
//! The subscriber is only initialised when `CXXTRAITS_LOG` (or `RUST_LOG`)
//! is set, so nothing is paid for in normal use.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a format name; anything unrecognised is `Text`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Read `CXXTRAITS_LOG_FORMAT`.
    fn from_env() -> Self {
        Self::parse(&std::env::var("CXXTRAITS_LOG_FORMAT").unwrap_or_default())
    }
}

/// Build an `EnvFilter` from `CXXTRAITS_LOG`, falling back to `RUST_LOG`.
///
/// `CXXTRAITS_LOG` takes precedence when both are set. Values use the same
/// syntax as `RUST_LOG` (e.g. `debug`, `cxxtraits_solver::expr=trace`).
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("CXXTRAITS_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `CXXTRAITS_LOG` nor `RUST_LOG` is set, or
/// when a global subscriber is already installed. All output goes to
/// stderr.
pub fn init_tracing() {
    let has_own_log = std::env::var("CXXTRAITS_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_own_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    let format = LogFormat::from_env();

    let installed = match format {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);

            Registry::default()
                .with(filter)
                .with(tree_layer)
                .try_init()
                .is_ok()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default()
                .with(filter)
                .with(json_layer)
                .try_init()
                .is_ok()
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    };

    if installed {
        tracing::debug!(?format, "tracing initialised");
    }
}
