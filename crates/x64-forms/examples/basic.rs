//! Basic encoding example: the one-shot, encoder and custom-table APIs.
//!
//! Run with: `cargo run --example basic`

use x64_forms::{encode_line, encode_source, Encoder, Error, TemplateTable};

fn main() {
    println!("=== x64_forms basic example ===\n");

    // --- One-shot encoding ---
    println!("1. One-shot encoding (mov eax, 42; ret):");
    let bytes = encode_source("mov eax, 42\nret").unwrap();
    print_hex("   ", &bytes);

    // --- Per-statement listing ---
    println!("\n2. Function prologue/epilogue, one statement at a time:");
    let enc = Encoder::new();
    let body = [
        "push rbp",
        "mov rbp, rsp",
        "sub rsp, 0x20",
        "mov dword ptr [rbp - 4], edi",
        "xor eax, eax",
        "add rsp, 0x20",
        "pop rbp",
        "ret",
    ];
    for line in body {
        let insn = enc.encode_line(line).unwrap();
        let t = &enc.table().templates()[insn.template_index()];
        println!("   {:<32} {:<24} ; {}", line, insn.to_string(), t);
    }

    // --- Diagnostics ---
    println!("\n3. Errors point at the offending token:");
    for src in ["mov eax, rbx", "push rax, rbx", "frobnicate rax", "mov ah, sil"] {
        match encode_line(src) {
            Ok(insn) => println!("   {:<20} -> {}", src, insn),
            Err(Error::Encode { kind, token, span }) => {
                println!("   {:<20} -> {} at col {} (`{}`)", src, kind, span.col, token)
            }
            Err(e) => println!("   {:<20} -> {}", src, e),
        }
    }

    // --- Custom table ---
    println!("\n4. A custom two-row table:");
    let table = TemplateTable::compile([("PUSH r/m64", "FF /6"), ("PUSH r64", "50+rd")]);
    let enc = Encoder::with_table(table);
    print_hex("   ", enc.encode_line("push r12").unwrap().bytes());
}

fn print_hex(prefix: &str, bytes: &[u8]) {
    let hex: Vec<String> = bytes.iter().map(|b| format!("{:02X}", b)).collect();
    println!("{}{}", prefix, hex.join(" "));
}
