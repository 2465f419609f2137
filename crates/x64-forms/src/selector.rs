//! Selection driver: tries every candidate template against a statement and
//! keeps the best outcome.
//!
//! Among successful matches the shortest encoding wins, with ties going to
//! the template that comes first in table order. If nothing matches, the
//! failure that got furthest into the statement is reported.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::encoder::{emit, Instruction};
use crate::error::{Error, ErrorKind, MatchError, Span};
use crate::lexer::{self, Token};
use crate::matcher::match_template;
use crate::template::TemplateTable;

/// Encoder settings.
///
/// ```rust
/// use x64_forms::{Encoder, EncoderConfig};
///
/// let mut enc = Encoder::new();
/// enc.config(EncoderConfig {
///     max_statement_tokens: 16,
///     ..EncoderConfig::default()
/// });
/// assert!(enc.encode_line("ret").is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncoderConfig {
    /// Only try templates whose mnemonic equals the statement's first token.
    /// Results are identical either way. Default: `true`.
    pub mnemonic_index: bool,
    /// Longest statement, in tokens, accepted by the line and source API.
    /// Default: 64.
    pub max_statement_tokens: usize,
    /// Largest input accepted by [`Encoder::encode_line`] and
    /// [`Encoder::encode_source`]. Default: 16 MiB.
    pub max_source_bytes: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            mnemonic_index: true,
            max_statement_tokens: 64,
            max_source_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Statement encoder over an immutable [`TemplateTable`].
///
/// Encoding never mutates the encoder, so one instance can be shared by
/// reference across threads.
///
/// # Examples
///
/// ```rust
/// use x64_forms::Encoder;
///
/// let enc = Encoder::new();
/// let insn = enc.encode(&["mov", "eax", ",", "5"]).unwrap();
/// assert_eq!(insn.bytes(), &[0xB8, 0x05, 0x00, 0x00, 0x00]);
/// ```
#[derive(Debug, Clone)]
pub struct Encoder {
    table: TemplateTable,
    config: EncoderConfig,
    // mnemonic -> template indices, ascending
    index: BTreeMap<String, Vec<usize>>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    /// Encoder over the built-in general-purpose table with default settings.
    pub fn new() -> Self {
        Self::with_table(TemplateTable::builtin())
    }

    /// Encoder over a caller-supplied table.
    pub fn with_table(table: TemplateTable) -> Self {
        let mut index: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, t) in table.templates().iter().enumerate() {
            index.entry(t.mnemonic().to_string()).or_default().push(i);
        }
        Self {
            table,
            config: EncoderConfig::default(),
            index,
        }
    }

    /// Replace the settings.
    pub fn config(&mut self, config: EncoderConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Current settings.
    pub fn settings(&self) -> &EncoderConfig {
        &self.config
    }

    /// The template table this encoder selects from.
    pub fn table(&self) -> &TemplateTable {
        &self.table
    }

    /// Encode one statement given as a token stream.
    ///
    /// # Errors
    ///
    /// When no template matches, returns the failure with the fewest
    /// unconsumed tokens; ties keep the earliest. A statement whose mnemonic
    /// is unknown reports every token unconsumed with
    /// [`ErrorKind::InvalidInstruction`].
    pub fn encode<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Instruction, MatchError> {
        let mut best: Option<Instruction> = None;
        let mut deepest = MatchError::new(tokens.len(), ErrorKind::InvalidInstruction);

        let mut attempt = |i: usize| {
            let Some(template) = self.table.get(i) else {
                return;
            };
            match match_template(template, tokens) {
                Ok(caps) => {
                    let bytes = emit(template, &caps);
                    log::trace!("template #{} `{}` matched: {}", i, template, bytes);
                    if best.as_ref().map_or(true, |b| bytes.len() < b.len()) {
                        log::trace!("new best: template #{} ({} bytes)", i, bytes.len());
                        best = Some(Instruction::new(bytes, i));
                    }
                }
                Err(e) => {
                    log::trace!("template #{} `{}` failed: {}", i, template, e);
                    if e.remaining < deepest.remaining {
                        log::trace!("new deepest failure: template #{} ({})", i, e);
                        deepest = e;
                    }
                }
            }
        };

        if self.config.mnemonic_index {
            let candidates = tokens
                .first()
                .and_then(|m| self.index.get(&m.as_ref().to_ascii_lowercase()));
            for &i in candidates.map_or(&[][..], Vec::as_slice) {
                attempt(i);
            }
        } else {
            for i in 0..self.table.len() {
                attempt(i);
            }
        }

        match best {
            Some(insn) => Ok(insn),
            None => {
                log::trace!(
                    "no template matched `{}`: {}",
                    lexer::join(tokens),
                    deepest
                );
                Err(deepest)
            }
        }
    }

    /// Tokenize and encode one statement.
    ///
    /// # Errors
    ///
    /// [`Error::Syntax`] if the text does not lex or does not hold exactly one
    /// statement, [`Error::Encode`] pointing at the offending token if no
    /// template matches, or [`Error::ResourceLimitExceeded`].
    pub fn encode_line(&self, line: &str) -> Result<Instruction, Error> {
        self.check_source_len(line)?;
        let mut stmts = lexer::statements(line)?;
        if stmts.len() > 1 {
            let span = stmts[1].first().map_or_else(Span::dummy, |t| t.span);
            return Err(Error::Syntax {
                msg: "expected a single statement".into(),
                span,
            });
        }
        match stmts.pop() {
            Some(tokens) => self.encode_statement(&tokens),
            None => Err(Error::Syntax {
                msg: "empty statement".into(),
                span: Span::dummy(),
            }),
        }
    }

    /// Encode every statement in `source` and concatenate the machine code.
    ///
    /// Statements are separated by newlines or `;`; blank lines and comments
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Stops at the first statement that fails; see [`Encoder::encode_line`].
    pub fn encode_source(&self, source: &str) -> Result<Vec<u8>, Error> {
        self.check_source_len(source)?;
        let mut out = Vec::new();
        for tokens in lexer::statements(source)? {
            let insn = self.encode_statement(&tokens)?;
            out.extend_from_slice(insn.bytes());
        }
        Ok(out)
    }

    fn encode_statement(&self, tokens: &[Token<'_>]) -> Result<Instruction, Error> {
        if tokens.len() > self.config.max_statement_tokens {
            return Err(Error::ResourceLimitExceeded {
                resource: "statement tokens".into(),
                limit: self.config.max_statement_tokens,
            });
        }
        self.encode(tokens).map_err(|e| {
            let offending = tokens.get(e.offending_index(tokens.len()));
            Error::Encode {
                kind: e.kind,
                token: offending.map_or_else(String::new, |t| t.text.to_string()),
                span: offending.map_or_else(Span::dummy, |t| t.span),
            }
        })
    }

    fn check_source_len(&self, source: &str) -> Result<(), Error> {
        if source.len() > self.config.max_source_bytes {
            return Err(Error::ResourceLimitExceeded {
                resource: "source bytes".into(),
                limit: self.config.max_source_bytes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn encoder(rows: &[(&str, &str)]) -> Encoder {
        Encoder::with_table(TemplateTable::compile(rows.iter().copied()))
    }

    #[test]
    fn shortest_encoding_wins() {
        let enc = encoder(&[("ADD r/m32, imm32", "81 /0 id"), ("ADD r/m32, imm8", "83 /0 ib")]);
        let insn = enc.encode(&["add", "eax", ",", "1"]).unwrap();
        assert_eq!(insn.bytes(), &[0x83, 0xC0, 0x01]);
        assert_eq!(insn.template_index(), 1);

        let insn = enc.encode(&["add", "eax", ",", "1000"]).unwrap();
        assert_eq!(insn.bytes(), &[0x81, 0xC0, 0xE8, 0x03, 0x00, 0x00]);
        assert_eq!(insn.template_index(), 0);
    }

    #[test]
    fn equal_length_keeps_table_order() {
        let enc = encoder(&[("MOV r/m32, r32", "89 /r"), ("MOV r32, r/m32", "8B /r")]);
        let insn = enc.encode(&["mov", "eax", ",", "ebx"]).unwrap();
        assert_eq!(insn.bytes(), &[0x89, 0xD8]);
        assert_eq!(insn.template_index(), 0);

        let enc = encoder(&[("MOV r32, r/m32", "8B /r"), ("MOV r/m32, r32", "89 /r")]);
        let insn = enc.encode(&["mov", "eax", ",", "ebx"]).unwrap();
        assert_eq!(insn.bytes(), &[0x8B, 0xC3]);
    }

    #[test]
    fn deepest_failure_is_reported() {
        let enc = encoder(&[("ADD r/m32, imm8", "83 /0 ib"), ("MOV r32, imm32", "B8+rd id")]);
        let err = enc.encode(&["mov", "eax", ",", "rbx"]).unwrap_err();
        assert_eq!(err, MatchError::new(1, ErrorKind::InvalidOperand));
    }

    #[test]
    fn unknown_mnemonic_reports_seed() {
        let enc = encoder(&[("NOP", "90")]);
        for indexed in [true, false] {
            let mut enc = enc.clone();
            enc.config(EncoderConfig {
                mnemonic_index: indexed,
                ..EncoderConfig::default()
            });
            let err = enc.encode(&["foo"]).unwrap_err();
            assert_eq!(err, MatchError::new(1, ErrorKind::InvalidInstruction));
            let err = enc.encode(&["foo", "eax"]).unwrap_err();
            assert_eq!(err, MatchError::new(2, ErrorKind::InvalidInstruction));
        }
    }

    #[test]
    fn caller_rows_cannot_overflow_an_instruction() {
        let mut overlong = "66 ".repeat(16);
        overlong.push_str("90");
        let enc = Encoder::with_table(TemplateTable::compile([
            ("XNOP", overlong.as_str()),
            ("ADD r/m32, imm32", "83 /0 ib"),
        ]));
        assert_eq!(enc.table().len(), 0);
        assert_eq!(enc.table().rejected(), 2);
        assert_eq!(
            enc.encode(&["xnop"]).unwrap_err(),
            MatchError::new(1, ErrorKind::InvalidInstruction)
        );
        assert!(enc.encode(&["add", "eax", ",", "1000"]).is_err());
    }

    #[test]
    fn index_does_not_change_results() {
        let mut plain = Encoder::new();
        plain.config(EncoderConfig {
            mnemonic_index: false,
            ..EncoderConfig::default()
        });
        let indexed = Encoder::new();
        let statements: [&[&str]; 6] = [
            &["mov", "eax", ",", "5"],
            &["MOV", "RAX", ",", "qword", "ptr", "[", "rsp", "+", "8", "]"],
            &["add", "eax", ",", "rbx"],
            &["push", "r12"],
            &["frobnicate"],
            &["ret", "1", "2"],
        ];
        for stmt in statements {
            assert_eq!(plain.encode(stmt), indexed.encode(stmt), "{:?}", stmt);
        }
    }

    #[test]
    fn encode_line_points_at_offending_token() {
        let enc = Encoder::new();
        let err = enc.encode_line("mov eax, rbx").unwrap_err();
        assert_eq!(
            err,
            Error::Encode {
                kind: ErrorKind::InvalidOperand,
                token: "rbx".into(),
                span: Span::new(1, 10, 9, 3),
            }
        );
        let err = enc.encode_line("foo").unwrap_err();
        assert!(matches!(
            err,
            Error::Encode { kind: ErrorKind::InvalidInstruction, ref token, .. } if token == "foo"
        ));
    }

    #[test]
    fn encode_line_rejects_empty_and_multiple_statements() {
        let enc = Encoder::new();
        assert!(matches!(enc.encode_line("  # nothing"), Err(Error::Syntax { .. })));
        assert!(matches!(enc.encode_line("nop; nop"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn encode_source_concatenates() {
        let enc = Encoder::new();
        let code = enc
            .encode_source("push rbp\nmov rbp, rsp # frame\n\npop rbp; ret\n")
            .unwrap();
        assert_eq!(code, vec![0x55, 0x48, 0x89, 0xE5, 0x5D, 0xC3]);
    }

    #[test]
    fn statement_token_limit() {
        let mut enc = Encoder::new();
        enc.config(EncoderConfig {
            max_statement_tokens: 3,
            ..EncoderConfig::default()
        });
        assert_eq!(
            enc.encode_line("add eax, 1"),
            Err(Error::ResourceLimitExceeded {
                resource: "statement tokens".into(),
                limit: 3,
            })
        );
        assert!(enc.encode_line("push rax").is_ok());
    }

    #[test]
    fn source_size_limit() {
        let mut enc = Encoder::new();
        enc.config(EncoderConfig {
            max_source_bytes: 4,
            ..EncoderConfig::default()
        });
        assert!(matches!(
            enc.encode_source("nop\nnop"),
            Err(Error::ResourceLimitExceeded { limit: 4, .. })
        ));
        assert!(enc.encode_source("ret").is_ok());
    }
}
