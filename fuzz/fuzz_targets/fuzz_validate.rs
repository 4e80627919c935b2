#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Validation must never panic, and a rejection always carries a code
    if let Err(kind) = zenrle8::validate(data) {
        assert!((1..=14).contains(&kind.code()));
    }
});
