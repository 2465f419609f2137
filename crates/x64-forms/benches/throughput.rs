//! Performance benchmarks for `x64_forms`.
//!
//! Measures:
//! - Single statement latency, with and without the mnemonic index
//! - Multi-statement throughput (bytes of source text)
//! - Template table compilation
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use x64_forms::table::X86_64_ROWS;
use x64_forms::{Encoder, EncoderConfig, TemplateTable};

// ─── Single-Statement Latency ────────────────────────────────────────────────

const SINGLE: &[(&str, &str)] = &[
    ("nop", "nop"),
    ("mov_reg_imm", "mov rax, 0x1234"),
    ("add_reg_reg", "add rax, rbx"),
    ("add_reg_imm8", "add ecx, 1"),
    ("mov_mem_disp32", "mov qword ptr [r12 + 0x200], rdx"),
    ("lea_rip", "lea rax, [rip + 64]"),
    ("jcc_rel32", "jne 1000"),
];

fn bench_single_statement(c: &mut Criterion) {
    let indexed = Encoder::new();
    let mut scan = Encoder::new();
    scan.config(EncoderConfig {
        mnemonic_index: false,
        ..EncoderConfig::default()
    });

    let mut group = c.benchmark_group("single_statement");
    for (name, src) in SINGLE {
        group.bench_function(format!("indexed/{name}"), |b| {
            b.iter(|| indexed.encode_line(black_box(src)).unwrap())
        });
        group.bench_function(format!("scan/{name}"), |b| {
            b.iter(|| scan.encode_line(black_box(src)).unwrap())
        });
    }
    group.finish();
}

// ─── Multi-Statement Throughput ──────────────────────────────────────────────

/// Generate a block of `n` statements cycling through common forms.
fn gen_block(n: usize) -> String {
    let mut s = String::with_capacity(n * 24);
    for i in 0..n {
        match i % 8 {
            0 => s.push_str("push rbp\n"),
            1 => s.push_str("mov rbp, rsp\n"),
            2 => s.push_str("sub rsp, 32\n"),
            3 => s.push_str("mov dword ptr [rbp - 4], edi\n"),
            4 => s.push_str("add eax, dword ptr [rbp - 4]\n"),
            5 => s.push_str("cmp r8, 100\n"),
            6 => s.push_str("jle -20\n"),
            _ => s.push_str("leave; ret\n"),
        }
    }
    s
}

fn bench_source_throughput(c: &mut Criterion) {
    let enc = Encoder::new();
    let mut group = c.benchmark_group("source_throughput");
    for n in [100, 1_000] {
        let src = gen_block(n);
        group.throughput(Throughput::Bytes(src.len() as u64));
        group.bench_function(format!("{n}_statements"), |b| {
            b.iter(|| enc.encode_source(black_box(&src)).unwrap())
        });
    }
    group.finish();
}

// ─── Table Compilation ───────────────────────────────────────────────────────

fn bench_table_compile(c: &mut Criterion) {
    c.bench_function("table_compile_builtin", |b| {
        b.iter(|| TemplateTable::compile(black_box(X86_64_ROWS.iter().copied())))
    });
    c.bench_function("encoder_new", |b| b.iter(Encoder::new));
}

criterion_group!(
    benches,
    bench_single_statement,
    bench_source_throughput,
    bench_table_compile
);
criterion_main!(benches);
