#![no_main]

use libfuzzer_sys::fuzz_target;
use peephole_core::names::{self, NameSpec};

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        match names::derive(s, &NameSpec::default()) {
            Ok(derived) => assert!(derived.starts_with(names::DEFAULT_PREFIX)),
            Err(rejected) => assert!(s.contains(rejected.offending)),
        }
    }
});
