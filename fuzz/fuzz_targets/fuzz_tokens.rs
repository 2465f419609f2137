#![no_main]
use libfuzzer_sys::fuzz_target;

// Raw token streams skip the lexer, so the matcher sees tokens it never
// would otherwise: empty strings, embedded spaces, odd number shapes.
fuzz_target!(|tokens: Vec<String>| {
    let enc = x64_forms::Encoder::new();
    match enc.encode(tokens.as_slice()) {
        Ok(insn) => assert!(!insn.is_empty() && insn.len() <= 15),
        Err(e) => assert!(e.remaining <= tokens.len()),
    }
});
