#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Must never panic, only return Ok/Err.
    let _ = x64_forms::encode_source(data);

    // Statement by statement through one shared encoder.
    let enc = x64_forms::Encoder::new();
    for line in data.lines() {
        if let Ok(insn) = enc.encode_line(line) {
            assert!(insn.len() <= 15, "overlong encoding for `{line}`");
        }
    }
});
