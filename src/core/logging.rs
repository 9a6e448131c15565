use tracing::Level;
use tracing_subscriber::fmt;

/// Initialize logging on stderr so the gauge on stdout stays readable
pub fn init(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    let _ = fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Initialize structured logging for tests
pub fn init_for_tests() { let _ = fmt().with_target(false).with_test_writer().try_init(); }
