//! Lexer for Intel-syntax statement text.
//!
//! Produces the flat token stream the matcher consumes: identifiers, numeric
//! literals, and the punctuation `,` `[` `]` `+` `-`. Whitespace is dropped,
//! `#` starts a comment running to end of line, and newlines or `;` separate
//! statements. Every token keeps its [`Span`] so a failed match can be
//! reported against the source text.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{Error, Span};
use crate::matcher::parse_number;

/// A token produced by the lexer. The text is borrowed from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    /// Token classification.
    pub kind: TokenKind,
    /// Source text of the token.
    pub text: &'src str,
    /// Source location.
    pub span: Span,
}

impl AsRef<str> for Token<'_> {
    fn as_ref(&self) -> &str {
        self.text
    }
}

/// The type of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Mnemonic, register name or size keyword.
    Ident,
    /// Unsigned numeric literal; a sign is always a separate [`TokenKind::Minus`].
    Number(u64),
    /// `,`
    Comma,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// Statement separator (`\n` or `;`).
    Newline,
}

/// Tokenize `source`, keeping statement separators as [`TokenKind::Newline`].
///
/// # Errors
///
/// Returns [`Error::Syntax`] for a character that cannot start a token or a
/// numeric literal that is malformed or does not fit in 64 bits.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, Error> {
    let mut tokens = Vec::with_capacity(source.len() / 3 + 1);
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut pos = 0;
    let mut line: u32 = 1;
    let mut line_start = 0usize;

    while pos < len {
        let ch = bytes[pos];
        let col = (pos - line_start) as u32 + 1;

        if ch == b' ' || ch == b'\t' || ch == b'\r' {
            pos += 1;
            continue;
        }

        // Comment: # to EOL
        if ch == b'#' {
            while pos < len && bytes[pos] != b'\n' {
                pos += 1;
            }
            continue;
        }

        let punct = match ch {
            b'\n' | b';' => Some(TokenKind::Newline),
            b',' => Some(TokenKind::Comma),
            b'[' => Some(TokenKind::OpenBracket),
            b']' => Some(TokenKind::CloseBracket),
            b'+' => Some(TokenKind::Plus),
            b'-' => Some(TokenKind::Minus),
            _ => None,
        };
        if let Some(kind) = punct {
            tokens.push(Token {
                kind,
                text: &source[pos..pos + 1],
                span: Span::new(line, col, pos, 1),
            });
            pos += 1;
            if ch == b'\n' {
                line += 1;
                line_start = pos;
            }
            continue;
        }

        if ch.is_ascii_alphanumeric() || ch == b'_' || ch == b'.' {
            let start = pos;
            while pos < len
                && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_' || bytes[pos] == b'.')
            {
                pos += 1;
            }
            let text = &source[start..pos];
            let span = Span::new(line, col, start, pos - start);
            let kind = if ch.is_ascii_digit() {
                let value = parse_number(text).ok_or_else(|| Error::Syntax {
                    msg: format!("invalid numeric literal '{}'", text),
                    span,
                })?;
                TokenKind::Number(value)
            } else {
                TokenKind::Ident
            };
            tokens.push(Token { kind, text, span });
            continue;
        }

        // only ASCII has been consumed so far, so `pos` is a char boundary
        let bad = source[pos..]
            .chars()
            .next()
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        return Err(Error::Syntax {
            msg: format!("unexpected character '{}'", bad),
            span: Span::new(line, col, pos, bad.len_utf8()),
        });
    }

    Ok(tokens)
}

/// Tokenize `source` and split it into statements, dropping separators and
/// empty statements.
///
/// # Errors
///
/// Propagates [`tokenize`] errors.
pub fn statements(source: &str) -> Result<Vec<Vec<Token<'_>>>, Error> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for tok in tokenize(source)? {
        if tok.kind == TokenKind::Newline {
            if !current.is_empty() {
                out.push(core::mem::take(&mut current));
            }
        } else {
            current.push(tok);
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    Ok(out)
}

/// Render a token slice back to text, space separated. Used in log output.
pub(crate) fn join<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut out = String::new();
    for (i, t) in tokens.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(t.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn tok_kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn tok_texts(src: &str) -> Vec<&str> {
        tokenize(src).unwrap().into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn empty_input() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   \t  ").unwrap().is_empty());
        assert!(tokenize("# just a comment").unwrap().is_empty());
    }

    #[test]
    fn simple_instruction() {
        assert_eq!(
            tok_kinds("mov rax, rbx"),
            vec![
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Comma,
                TokenKind::Ident
            ]
        );
    }

    #[test]
    fn memory_operand() {
        assert_eq!(
            tok_texts("add dword ptr [rbx + 200], 1"),
            vec!["add", "dword", "ptr", "[", "rbx", "+", "200", "]", ",", "1"]
        );
        assert_eq!(
            tok_texts("lea rax,[rbp-8]"),
            vec!["lea", "rax", ",", "[", "rbp", "-", "8", "]"]
        );
    }

    #[test]
    fn minus_is_always_separate() {
        let tokens = tokenize("push -1").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Minus);
        assert_eq!(tokens[2].kind, TokenKind::Number(1));
    }

    #[test]
    fn numeric_literals() {
        let tokens = tokenize("0xFF 0b1010 0o77 42").unwrap();
        let values: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            values,
            vec![
                TokenKind::Number(255),
                TokenKind::Number(10),
                TokenKind::Number(63),
                TokenKind::Number(42)
            ]
        );
        assert_eq!(tokens[0].text, "0xFF");
    }

    #[test]
    fn malformed_number() {
        let err = tokenize("mov eax, 0xZZ").unwrap_err();
        match err {
            Error::Syntax { msg, span } => {
                assert!(msg.contains("0xZZ"));
                assert_eq!(span.col, 10);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(tokenize("mov rax, 99999999999999999999999").is_err());
    }

    #[test]
    fn unexpected_character() {
        let err = tokenize("mov eax, $5").unwrap_err();
        assert_eq!(
            err,
            Error::Syntax {
                msg: "unexpected character '$'".into(),
                span: Span::new(1, 10, 9, 1),
            }
        );
    }

    #[test]
    fn spans_track_lines_and_columns() {
        let tokens = tokenize("nop\n  ret").unwrap();
        assert_eq!(tokens[0].span, Span::new(1, 1, 0, 3));
        assert_eq!(tokens[1].kind, TokenKind::Newline);
        assert_eq!(tokens[2].span, Span::new(2, 3, 6, 3));
    }

    #[test]
    fn statements_split_on_newline_and_semicolon() {
        let stmts = statements("nop; ret\n\n# comment\npush rax # trailing\n;").unwrap();
        let texts: Vec<Vec<&str>> = stmts
            .iter()
            .map(|s| s.iter().map(|t| t.text).collect())
            .collect();
        assert_eq!(texts, vec![vec!["nop"], vec!["ret"], vec!["push", "rax"]]);
    }

    #[test]
    fn join_tokens() {
        assert_eq!(join(&["mov", "eax", ",", "1"]), "mov eax , 1");
    }
}
