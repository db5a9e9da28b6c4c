// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tracing-subscriber` setup (spec §3 ambient "Logging").
//!
//! Grounded on `oj-daemon/src/main.rs`'s `setup_logging`, minus the
//! rotated-file half: this daemon is container-native and logs to stdout
//! for the surrounding platform to ship, rather than owning log rotation
//! itself.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}
