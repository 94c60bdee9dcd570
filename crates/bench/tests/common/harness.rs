use framebench_core::sim::{Dut, Simulator};
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once per process.
///
/// Honors `RUST_LOG`; defaults to warnings only so noise injections show up.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Binds `dut` to a fresh kernel with logging enabled.
pub fn bench<D: Dut>(dut: D) -> Simulator<D> {
    init_tracing();
    Simulator::new(dut).unwrap()
}
