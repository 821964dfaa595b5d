//! Shared I/O boundary for the `hmax`, `lmcut`, and `planner` binaries:
//! SAS⁺ file loading, logging setup.

use anyhow::{Context, Result};
use sas_task::{parse_sas_task, SasTask};
use std::path::Path;

/// Reads and parses a SAS⁺ task file, wrapping both I/O and format errors in
/// an `anyhow::Error` so the binaries can surface them with `.context(...)`
/// on stderr and exit nonzero.
pub fn load_task(path: &Path) -> Result<SasTask> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_sas_task(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Installs a `tracing_subscriber::fmt` subscriber gated by `RUST_LOG`,
/// defaulting to `warn` when unset.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
