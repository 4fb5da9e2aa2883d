//! Fuzz target for the TOML configuration parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_config_parser
//!
//! Feeds arbitrary bytes to `AppConfig::parse()` to find panics or hangs in
//! TOML parsing and validation.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = repotext_config::AppConfig::parse(s) {
            // Anything that parsed must also pass validation on its own.
            assert!(config.validate().is_ok());
        }
    }
});
