#![no_main]

use libfuzzer_sys::fuzz_target;
use peephole::{PeepConfig, expand_source};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Parse failures are fine; panics are not
        if let Ok(expansion) = expand_source(s, &PeepConfig::default()) {
            // Whatever was produced must parse again
            assert!(expansion.has_errors() || reparses(&expansion.source));
        }
    }
});

fn reparses(source: &str) -> bool {
    expand_source(source, &PeepConfig::default()).is_ok()
}
