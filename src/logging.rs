// src/logging.rs
// =============================================================================
// Diagnostic logging setup.
//
// Progress lines meant for the user are printed with println!. Everything
// else (skipped books, failed downloads, per-request debug output) goes
// through `tracing` to stderr, so it can be filtered without touching stdout.
//
// RUST_LOG wins when set; otherwise -v / -vv raise the level from info.
// =============================================================================

use tracing_subscriber::EnvFilter;

pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    // Keep dependency crates (hyper, reqwest) quiet unless asked for
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,bookshelf_crawler={default_level}")));

    // try_init: a second call (tests, repeated menu runs) is not an error
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
