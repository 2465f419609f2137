//! Operand matcher: checks one statement's tokens against one template.
//!
//! Matching is strictly left to right with no backtracking inside a template;
//! the only retry is the driver moving on to the next template. A failure
//! reports how many tokens were left unaccepted, so the driver can rank
//! near-misses by how far they got.

use crate::error::{ErrorKind, MatchError};
use crate::register::Register;
use crate::template::{InstructionTemplate, OperandSpec};

/// ModR/M addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mod {
    /// Register-direct operand (`mod = 11`).
    NoDereference,
    /// `[base]` with no displacement bytes (`mod = 00`).
    NoOffset,
    /// `[base + disp8]` (`mod = 01`).
    Offset8Bit,
    /// `[base + disp32]` (`mod = 10`).
    Offset32Bit,
}

impl Mod {
    /// The two `mod` bits of the ModR/M byte.
    pub fn bits(self) -> u8 {
        match self {
            Mod::NoOffset => 0b00,
            Mod::Offset8Bit => 0b01,
            Mod::Offset32Bit => 0b10,
            Mod::NoDereference => 0b11,
        }
    }

    /// The narrowest memory mode able to hold `disp`.
    pub fn for_displacement(disp: i32) -> Mod {
        if disp == 0 {
            Mod::NoOffset
        } else if i8::try_from(disp).is_ok() {
            Mod::Offset8Bit
        } else {
            Mod::Offset32Bit
        }
    }

    /// Number of displacement bytes that follow ModR/M (and SIB) in this mode.
    pub fn displacement_len(self) -> usize {
        match self {
            Mod::Offset8Bit => 1,
            Mod::Offset32Bit => 4,
            Mod::NoDereference | Mod::NoOffset => 0,
        }
    }
}

/// The operand that goes through the ModR/M r/m field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addressing {
    /// The register itself (`NoDereference`) or the memory base.
    pub base: Register,
    /// Addressing mode as matched; memory displacements start out as
    /// `Offset32Bit` and are narrowed by the emitter.
    pub mode: Mod,
    /// Signed displacement, when one was written.
    pub displacement: Option<i32>,
}

impl Addressing {
    /// Whether this is a memory reference rather than a bare register.
    pub fn is_memory(&self) -> bool {
        self.mode != Mod::NoDereference
    }
}

/// Values captured by a successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captures {
    reg: Option<Register>,
    addressing: Option<Addressing>,
    immediates: [i64; 2],
    immediate_count: u8,
    consumed: usize,
}

impl Captures {
    fn new() -> Self {
        Captures {
            reg: None,
            addressing: None,
            immediates: [0; 2],
            immediate_count: 0,
            consumed: 0,
        }
    }

    /// The register operand (generic register slot), if the template has one.
    pub fn reg(&self) -> Option<Register> {
        self.reg
    }

    /// The r/m operand, if the template has one.
    pub fn addressing(&self) -> Option<&Addressing> {
        self.addressing.as_ref()
    }

    /// Immediate and relative values in operand declaration order.
    pub fn immediates(&self) -> &[i64] {
        &self.immediates[..self.immediate_count as usize]
    }

    /// Number of tokens the match accepted; always the full statement length.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Every register the encoding refers to (register operand, r/m register
    /// or memory base).
    pub fn registers(&self) -> impl Iterator<Item = Register> + '_ {
        self.reg
            .into_iter()
            .chain(self.addressing.map(|a| a.base))
    }

    fn push_immediate(&mut self, value: i64) {
        // templates carry at most two operands
        self.immediates[self.immediate_count as usize] = value;
        self.immediate_count += 1;
    }
}

struct Cursor<'t, S> {
    tokens: &'t [S],
    pos: usize,
}

impl<'t, S: AsRef<str>> Cursor<'t, S> {
    fn peek(&self) -> Option<&'t str> {
        self.tokens.get(self.pos).map(AsRef::as_ref)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }

    fn fail(&self, kind: ErrorKind) -> MatchError {
        MatchError::new(self.remaining(), kind)
    }

    /// Accept the next token if it equals `expected` (ASCII case-insensitive).
    fn expect(&mut self, expected: &str, kind: ErrorKind) -> Result<(), MatchError> {
        match self.peek() {
            Some(tok) if tok.eq_ignore_ascii_case(expected) => {
                self.advance();
                Ok(())
            }
            _ => Err(self.fail(kind)),
        }
    }
}

/// Match `tokens` (one full statement) against `template`.
///
/// # Errors
///
/// Returns a [`MatchError`] carrying the number of tokens not yet accepted
/// and the reason the template does not apply.
pub fn match_template<S: AsRef<str>>(
    template: &InstructionTemplate,
    tokens: &[S],
) -> Result<Captures, MatchError> {
    let mut cur = Cursor { tokens, pos: 0 };
    let mut caps = Captures::new();

    cur.expect(template.mnemonic(), ErrorKind::InvalidInstruction)?;

    for (i, spec) in template.operands().iter().enumerate() {
        if i > 0 {
            cur.expect(",", ErrorKind::InvalidOperand)?;
        }
        match spec {
            OperandSpec::Immediate(bits) | OperandSpec::Relative(bits) => {
                let value = immediate(&mut cur, *bits)?;
                caps.push_immediate(value);
            }
            OperandSpec::FixedOperand(tok) => cur.expect(tok, ErrorKind::InvalidOperand)?,
            OperandSpec::GenericRegister(bits) => {
                caps.reg = Some(register(&mut cur, *bits)?);
            }
            OperandSpec::RegisterOrMemory(bits) => {
                let addressing = match register(&mut cur, *bits) {
                    Ok(base) => Addressing {
                        base,
                        mode: Mod::NoDereference,
                        displacement: None,
                    },
                    Err(_) => memory(&mut cur, Some(*bits))?,
                };
                caps.addressing = Some(addressing);
            }
            OperandSpec::DirectMemory => {
                caps.addressing = Some(memory(&mut cur, None)?);
            }
        }
    }

    if cur.peek().is_some() {
        return Err(cur.fail(ErrorKind::ExtraneousTokenAfterInstruction));
    }

    // AH/CH/DH/BH are re-purposed as SPL/BPL/SIL/DIL once a REX byte exists
    let has_high_byte = caps.registers().any(Register::is_high_byte);
    let needs_rex = template.has_rex_marker()
        || caps
            .registers()
            .any(|r| r.is_extended() || r.requires_rex_for_byte());
    if has_high_byte && needs_rex {
        return Err(cur.fail(ErrorKind::InvalidOperand));
    }

    caps.consumed = cur.pos;
    Ok(caps)
}

fn register<S: AsRef<str>>(cur: &mut Cursor<'_, S>, bits: u16) -> Result<Register, MatchError> {
    match cur.peek().and_then(|tok| Register::with_width(tok, bits)) {
        Some(reg) => {
            cur.advance();
            Ok(reg)
        }
        None => Err(cur.fail(ErrorKind::InvalidOperand)),
    }
}

/// An optional `-` token followed by a literal that fits `bits` as a signed value.
fn immediate<S: AsRef<str>>(cur: &mut Cursor<'_, S>, bits: u16) -> Result<i64, MatchError> {
    let negative = cur.peek() == Some("-");
    if negative {
        cur.advance();
    }
    let magnitude = cur
        .peek()
        .and_then(parse_number)
        .ok_or_else(|| cur.fail(ErrorKind::InvalidOperand))?;
    let value = if negative {
        -i128::from(magnitude)
    } else {
        i128::from(magnitude)
    };
    if !fits_signed(value, bits) {
        return Err(cur.fail(ErrorKind::InvalidOperand));
    }
    cur.advance();
    Ok(value as i64)
}

/// `[size ptr] [ base ]` or `[size ptr] [ base +/- disp ]`.
///
/// `size` is the required access width; `None` makes the size keyword optional
/// and unconstrained.
fn memory<S: AsRef<str>>(
    cur: &mut Cursor<'_, S>,
    size: Option<u16>,
) -> Result<Addressing, MatchError> {
    match size {
        Some(bits) => {
            let keyword = match bits {
                8 => "byte",
                16 => "word",
                32 => "dword",
                _ => "qword",
            };
            cur.expect(keyword, ErrorKind::InvalidOperand)?;
            cur.expect("ptr", ErrorKind::InvalidOperand)?;
        }
        None => {
            if cur.peek().and_then(size_keyword_bits).is_some() {
                cur.advance();
                cur.expect("ptr", ErrorKind::InvalidOperand)?;
            }
        }
    }
    cur.expect("[", ErrorKind::InvalidOperand)?;

    let base = cur
        .peek()
        .and_then(Register::memory_base)
        .filter(|r| matches!(r.size_bits(), 32 | 64))
        .ok_or_else(|| cur.fail(ErrorKind::InvalidOperand))?;
    cur.advance();

    let sign = match cur.peek() {
        Some("]") => {
            cur.advance();
            return Ok(Addressing {
                base,
                mode: Mod::NoOffset,
                displacement: None,
            });
        }
        Some("+") => 1,
        Some("-") => -1,
        _ => return Err(cur.fail(ErrorKind::InvalidOperand)),
    };
    cur.advance();

    let displacement = cur
        .peek()
        .and_then(parse_number)
        .map(|m| i128::from(m) * sign)
        .and_then(|d| i32::try_from(d).ok())
        .ok_or_else(|| cur.fail(ErrorKind::InvalidOperand))?;
    cur.advance();
    cur.expect("]", ErrorKind::InvalidOperand)?;

    Ok(Addressing {
        base,
        mode: Mod::Offset32Bit,
        displacement: Some(displacement),
    })
}

fn size_keyword_bits(tok: &str) -> Option<u16> {
    [("byte", 8), ("word", 16), ("dword", 32), ("qword", 64)]
        .iter()
        .find(|(kw, _)| tok.eq_ignore_ascii_case(kw))
        .map(|(_, bits)| *bits)
}

/// Parse an unsigned literal: decimal, or `0x`/`0b`/`0o` prefixed.
pub(crate) fn parse_number(tok: &str) -> Option<u64> {
    if !tok.as_bytes().first()?.is_ascii_digit() {
        return None;
    }
    let (digits, radix) = match tok.get(..2) {
        Some("0x" | "0X") => (&tok[2..], 16),
        Some("0b" | "0B") => (&tok[2..], 2),
        Some("0o" | "0O") => (&tok[2..], 8),
        _ => (tok, 10),
    };
    if digits.is_empty() || digits.starts_with('+') {
        return None;
    }
    u64::from_str_radix(digits, radix).ok()
}

fn fits_signed(value: i128, bits: u16) -> bool {
    let half = 1i128 << (bits - 1);
    -half <= value && value < half
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::compile_row;

    fn template(syntax: &str, opcode: &str) -> InstructionTemplate {
        compile_row(syntax, opcode).unwrap()
    }

    #[test]
    fn mnemonic_mismatch_reports_whole_statement() {
        let t = template("MOV r32, imm32", "B8+rd id");
        let err = match_template(&t, &["add", "eax", ",", "5"]).unwrap_err();
        assert_eq!(err, MatchError::new(4, ErrorKind::InvalidInstruction));
    }

    #[test]
    fn mnemonic_is_case_insensitive() {
        let t = template("MOV r32, imm32", "B8+rd id");
        let caps = match_template(&t, &["MOV", "EAX", ",", "5"]).unwrap();
        assert_eq!(caps.reg(), Some(Register::Eax));
        assert_eq!(caps.immediates(), &[5]);
        assert_eq!(caps.consumed(), 4);
    }

    #[test]
    fn missing_comma() {
        let t = template("MOV r32, imm32", "B8+rd id");
        let err = match_template(&t, &["mov", "eax", "5"]).unwrap_err();
        assert_eq!(err, MatchError::new(1, ErrorKind::InvalidOperand));
    }

    #[test]
    fn wrong_register_width() {
        let t = template("MOV r/m32, r32", "89 /r");
        let err = match_template(&t, &["mov", "eax", ",", "rbx"]).unwrap_err();
        assert_eq!(err, MatchError::new(1, ErrorKind::InvalidOperand));
    }

    #[test]
    fn trailing_tokens() {
        let t = template("PUSH r64", "50+rd");
        let err = match_template(&t, &["push", "rax", ",", "rbx"]).unwrap_err();
        assert_eq!(
            err,
            MatchError::new(2, ErrorKind::ExtraneousTokenAfterInstruction)
        );
    }

    #[test]
    fn running_out_of_tokens() {
        let t = template("ADD r/m32, imm8", "83 /0 ib");
        let err = match_template(&t, &["add", "eax", ","]).unwrap_err();
        assert_eq!(err, MatchError::new(0, ErrorKind::InvalidOperand));
    }

    #[test]
    fn immediate_range_is_signed() {
        let t = template("ADD r/m32, imm8", "83 /0 ib");
        assert!(match_template(&t, &["add", "eax", ",", "127"]).is_ok());
        assert!(match_template(&t, &["add", "eax", ",", "-", "128"]).is_ok());
        let err = match_template(&t, &["add", "eax", ",", "128"]).unwrap_err();
        assert_eq!(err, MatchError::new(1, ErrorKind::InvalidOperand));
        let err = match_template(&t, &["add", "eax", ",", "-", "129"]).unwrap_err();
        assert_eq!(err, MatchError::new(1, ErrorKind::InvalidOperand));
    }

    #[test]
    fn negative_immediate_value() {
        let t = template("PUSH imm8", "6A ib");
        let caps = match_template(&t, &["push", "-", "1"]).unwrap();
        assert_eq!(caps.immediates(), &[-1]);
    }

    #[test]
    fn fixed_operand() {
        let t = template("SHL r/m32, 1", "D1 /4");
        assert!(match_template(&t, &["shl", "eax", ",", "1"]).is_ok());
        let err = match_template(&t, &["shl", "eax", ",", "2"]).unwrap_err();
        assert_eq!(err, MatchError::new(1, ErrorKind::InvalidOperand));
    }

    #[test]
    fn register_or_memory_accepts_bare_register() {
        let t = template("NOT r/m64", "REX.W + F7 /2");
        let caps = match_template(&t, &["not", "r12"]).unwrap();
        let a = caps.addressing().unwrap();
        assert_eq!(a.base, Register::R12);
        assert_eq!(a.mode, Mod::NoDereference);
        assert!(!a.is_memory());
    }

    #[test]
    fn memory_operand_grammar() {
        let t = template("ADD r/m32, imm8", "83 /0 ib");
        let toks = ["add", "dword", "ptr", "[", "rbx", "+", "200", "]", ",", "1"];
        let caps = match_template(&t, &toks).unwrap();
        let a = caps.addressing().unwrap();
        assert_eq!(a.base, Register::Rbx);
        assert_eq!(a.mode, Mod::Offset32Bit);
        assert_eq!(a.displacement, Some(200));
        assert_eq!(caps.consumed(), toks.len());

        let caps = match_template(&t, &["add", "dword", "ptr", "[", "rbx", "]", ",", "1"]).unwrap();
        assert_eq!(caps.addressing().unwrap().mode, Mod::NoOffset);

        let caps = match_template(
            &t,
            &["add", "dword", "ptr", "[", "rbx", "-", "8", "]", ",", "1"],
        )
        .unwrap();
        assert_eq!(caps.addressing().unwrap().displacement, Some(-8));
    }

    #[test]
    fn memory_size_keyword_must_match() {
        let t = template("ADD r/m32, imm8", "83 /0 ib");
        let err = match_template(&t, &["add", "qword", "ptr", "[", "rbx", "]", ",", "1"])
            .unwrap_err();
        assert_eq!(err, MatchError::new(7, ErrorKind::InvalidOperand));
        let err = match_template(&t, &["add", "[", "rbx", "]", ",", "1"]).unwrap_err();
        assert_eq!(err, MatchError::new(5, ErrorKind::InvalidOperand));
    }

    #[test]
    fn malformed_memory_reports_position() {
        let t = template("ADD r/m32, imm8", "83 /0 ib");
        // missing closing bracket: fails on ","
        let err = match_template(&t, &["add", "dword", "ptr", "[", "rbx", "+", "4", ",", "1"])
            .unwrap_err();
        assert_eq!(err, MatchError::new(2, ErrorKind::InvalidOperand));
        // 16-bit base registers cannot address memory
        let err = match_template(&t, &["add", "dword", "ptr", "[", "bx", "]", ",", "1"])
            .unwrap_err();
        assert_eq!(err, MatchError::new(4, ErrorKind::InvalidOperand));
    }

    #[test]
    fn displacement_must_fit_32_bits() {
        let t = template("INC r/m64", "REX.W + FF /0");
        assert!(match_template(&t, &["inc", "qword", "ptr", "[", "rax", "+", "2147483647", "]"]).is_ok());
        assert!(match_template(&t, &["inc", "qword", "ptr", "[", "rax", "-", "2147483648", "]"]).is_ok());
        let err = match_template(&t, &["inc", "qword", "ptr", "[", "rax", "+", "2147483648", "]"])
            .unwrap_err();
        assert_eq!(err, MatchError::new(2, ErrorKind::InvalidOperand));
    }

    #[test]
    fn direct_memory_size_is_optional() {
        let t = template("LEA r64, m", "REX.W + 8D /r");
        assert!(match_template(&t, &["lea", "rax", ",", "[", "rbx", "+", "8", "]"]).is_ok());
        assert!(match_template(&t, &["lea", "rax", ",", "byte", "ptr", "[", "rbx", "]"]).is_ok());
        let err = match_template(&t, &["lea", "rax", ",", "rbx"]).unwrap_err();
        assert_eq!(err, MatchError::new(1, ErrorKind::InvalidOperand));
    }

    #[test]
    fn rip_is_a_valid_base() {
        let t = template("LEA r64, m", "REX.W + 8D /r");
        let caps = match_template(&t, &["lea", "rax", ",", "[", "rip", "+", "16", "]"]).unwrap();
        assert_eq!(caps.addressing().unwrap().base, Register::Rip);
    }

    #[test]
    fn two_immediates_keep_declaration_order() {
        let t = template("ENTER imm16, imm8", "C8 iw ib");
        let caps = match_template(&t, &["enter", "32", ",", "1"]).unwrap();
        assert_eq!(caps.immediates(), &[32, 1]);
    }

    #[test]
    fn high_byte_register_conflicts_with_rex() {
        let t = template("MOV r/m8, r8", "88 /r");
        assert!(match_template(&t, &["mov", "ah", ",", "bl"]).is_ok());
        let err = match_template(&t, &["mov", "ah", ",", "r8b"]).unwrap_err();
        assert_eq!(err, MatchError::new(0, ErrorKind::InvalidOperand));
        let err = match_template(&t, &["mov", "sil", ",", "ch"]).unwrap_err();
        assert_eq!(err, MatchError::new(0, ErrorKind::InvalidOperand));
    }

    #[test]
    fn number_literals() {
        assert_eq!(parse_number("42"), Some(42));
        assert_eq!(parse_number("0x2A"), Some(42));
        assert_eq!(parse_number("0b101010"), Some(42));
        assert_eq!(parse_number("0o52"), Some(42));
        assert_eq!(parse_number("0x"), None);
        assert_eq!(parse_number("eax"), None);
        assert_eq!(parse_number("+5"), None);
    }

    #[test]
    fn mode_for_displacement() {
        assert_eq!(Mod::for_displacement(0), Mod::NoOffset);
        assert_eq!(Mod::for_displacement(127), Mod::Offset8Bit);
        assert_eq!(Mod::for_displacement(-128), Mod::Offset8Bit);
        assert_eq!(Mod::for_displacement(128), Mod::Offset32Bit);
        assert_eq!(Mod::for_displacement(-129), Mod::Offset32Bit);
    }
}
