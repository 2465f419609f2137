//! # x64-forms
//!
//! Table-driven x86-64 instruction encoding.
//!
//! An instruction set is described as rows of `(syntax, opcode)` text in the
//! notation of the Intel manual's summary tables, e.g.
//! `("ADD r/m32, imm8", "83 /0 ib")`. Each row is compiled once into an
//! [`InstructionTemplate`]. A statement is encoded by matching its tokens
//! against every candidate template and keeping the shortest encoding; when
//! nothing matches, the failure that got furthest into the statement is
//! reported.
//!
//! ```text
//! rows ──compile──▶ TemplateTable ──┐
//!                                   ├─ match_template ─▶ Captures ─ emit ─▶ bytes
//! "add eax, 1" ──lexer──▶ tokens ───┘            (per template, best kept)
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! let code = x64_forms::encode_source("push rbp; mov rbp, rsp").unwrap();
//! assert_eq!(code, [0x55, 0x48, 0x89, 0xE5]);
//!
//! let insn = x64_forms::encode_line("add dword ptr [rbx + 200], 1").unwrap();
//! assert_eq!(insn.bytes(), &[0x83, 0x83, 0xC8, 0x00, 0x00, 0x00, 0x01]);
//! ```
//!
//! Token streams can be supplied directly, bypassing the lexer:
//!
//! ```rust
//! use x64_forms::{Encoder, ErrorKind};
//!
//! let enc = Encoder::new();
//! let err = enc.encode(&["mov", "eax", ",", "rbx"]).unwrap_err();
//! assert_eq!(err.kind, ErrorKind::InvalidOperand);
//! assert_eq!(err.remaining, 1);
//! ```
//!
//! ## Features
//!
//! - `std` (default): `std::error::Error` impls. Without it the crate is
//!   `no_std` + `alloc`.
//! - `serde`: `Serialize`/`Deserialize` for the public data types.
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade: dropped
//! table rows at `debug`, per-template attempts at `trace`.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
// Encoding is mostly narrowing casts between integer widths and dense hex
// literals; these lints fire on nearly every line of it.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::cast_possible_wrap,
    clippy::unreadable_literal,
    clippy::match_same_arms,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args,
    clippy::doc_markdown,
    clippy::missing_errors_doc
)]

extern crate alloc;

/// Encoding emitter: REX, ModR/M, SIB, displacement and immediates.
pub mod encoder;
/// Error types and source-span diagnostics.
pub mod error;
/// Statement tokenizer with span tracking.
pub mod lexer;
/// Operand matcher: one template against one statement.
pub mod matcher;
/// General-purpose register model.
pub mod register;
/// Selection driver and line/source API.
pub mod selector;
/// Built-in ISA rows.
pub mod table;
/// Template compiler for ISA table rows.
pub mod template;

// Re-exports
pub use encoder::{emit, InstrBytes, Instruction};
pub use error::{Error, ErrorKind, MatchError, RowRejection, Span};
pub use matcher::{match_template, Addressing, Captures, Mod};
pub use register::Register;
pub use selector::{Encoder, EncoderConfig};
pub use template::{compile_row, InstructionTemplate, OpcodePart, OperandSpec, TemplateTable};

use alloc::vec::Vec;

/// Encode a single statement with the built-in table.
///
/// Builds a fresh [`Encoder`]; reuse one when encoding many statements.
///
/// # Errors
///
/// See [`Encoder::encode_line`].
///
/// # Examples
///
/// ```rust
/// let insn = x64_forms::encode_line("mov eax, 5").unwrap();
/// assert_eq!(insn.bytes(), &[0xB8, 0x05, 0x00, 0x00, 0x00]);
/// ```
pub fn encode_line(line: &str) -> Result<Instruction, Error> {
    Encoder::new().encode_line(line)
}

/// Encode newline or `;` separated statements with the built-in table.
///
/// # Errors
///
/// See [`Encoder::encode_source`].
///
/// # Examples
///
/// ```rust
/// let code = x64_forms::encode_source("xor eax, eax\nret").unwrap();
/// assert_eq!(code, vec![0x31, 0xC0, 0xC3]);
/// ```
pub fn encode_source(source: &str) -> Result<Vec<u8>, Error> {
    Encoder::new().encode_source(source)
}
