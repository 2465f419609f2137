//! Template compiler: turns ISA reference rows into typed instruction forms.
//!
//! A row is a pair of strings in the style of the Intel manual's summary
//! tables, e.g. `("ADD r/m32, imm8", "83 /0 ib")`. The syntax column is split
//! into a mnemonic and up to two operand kinds; the opcode column is parsed
//! once into a closed [`OpcodePart`] program so that nothing on the encoding
//! path ever looks at opcode text again.
//!
//! Rows that use operand kinds or encoding forms this crate does not model
//! are dropped (and logged at `debug` level), never guessed at.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::error::RowRejection;

/// Operand kinds that are recognised but deliberately not modeled: vector,
/// segment, bound, control/debug and x87 registers, explicitly sized or
/// far memory forms, string operands.
const UNSUPPORTED_OPERANDS: &[&str] = &[
    "bnd", "bnd1", "bnd1/m64", "bnd1/m128", "CR0-CR7", "CR8", "DR0-DR7", "k1", "mem", "mm", "mm1",
    "moffs8", "moffs16", "moffs32", "moffs64", "m8", "m16", "m16int", "m2byte", "m32", "m32fp",
    "m32int", "m512", "m512byte", "m64", "m64f", "m64fp", "m64int", "m80bcd", "m80dec", "m80fp",
    "m128", "m14/28byte", "m16:16", "m16:32", "m16:64", "m16&16", "m16&32", "m16&64", "m32&32",
    "m94/108byte", "ptr16:16", "ptr16:32", "reg", "rel", "rel16", "r16/m16", "r32/m16", "r32/m32",
    "r64/m16", "r64/m64", "Sreg", "ST(i)", "ST(0)", "vm32y", "vm32z", "vm64z", "xmm", "xmm1",
    "xmm1/m32", "xmm1/m64", "xmm2", "xmm3/m128", "ymm1",
];

/// Operand tokens that must appear literally in the statement.
const FIXED_OPERANDS: &[&str] = &[
    "al", "ah", "ax", "eax", "rax", "cl", "ds", "dx", "es", "ss", "gs", "fs", "cs", "0", "1", "3",
];

/// Architectural limit on the length of one x86 instruction.
pub(crate) const MAX_INSTRUCTION_LEN: usize = 15;

/// Rows whose syntax column lacks the mnemonic, keyed by opcode pattern.
const OPCODE_NAME_OVERRIDES: &[(&str, &str)] = &[("CB", "retf"), ("CA iw", "retf")];

/// The abstract kind and width an instruction form expects in one operand slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperandSpec {
    /// A signed integer literal of the given bit width.
    Immediate(u16),
    /// A signed branch offset relative to the next instruction.
    Relative(u16),
    /// One exact token (lowercase), e.g. `eax`, `cl` or `1`.
    FixedOperand(String),
    /// Any register of the given width; `0` accepts every width.
    GenericRegister(u16),
    /// A register of the given width, or a memory reference accessing that many bits.
    RegisterOrMemory(u16),
    /// A memory reference of unspecified access width (`lea`).
    DirectMemory,
}

impl OperandSpec {
    /// Whether this operand is encoded through the ModR/M r/m field.
    pub fn is_addressing(&self) -> bool {
        matches!(
            self,
            OperandSpec::RegisterOrMemory(_) | OperandSpec::DirectMemory
        )
    }

    fn classify(raw: &str) -> Result<OperandSpec, RowRejection> {
        if UNSUPPORTED_OPERANDS.contains(&raw) {
            return Err(RowRejection::UnsupportedOperand(raw.to_string()));
        }
        let lower = raw.to_ascii_lowercase();
        let unsupported = || RowRejection::UnsupportedOperand(raw.to_string());
        let t = lower.as_str();

        if let Some(bits) = t.strip_prefix("imm") {
            return operand_width(bits).map(OperandSpec::Immediate).ok_or_else(unsupported);
        }
        if let Some(bits) = t.strip_prefix("rel") {
            return operand_width(bits).map(OperandSpec::Relative).ok_or_else(unsupported);
        }
        if FIXED_OPERANDS.contains(&t) {
            return Ok(OperandSpec::FixedOperand(lower));
        }
        if let Some(bits) = t.strip_prefix("r/m") {
            return operand_width(bits)
                .map(OperandSpec::RegisterOrMemory)
                .ok_or_else(unsupported);
        }
        if let Some(bits) = t.strip_prefix('r') {
            if bits.is_empty() {
                return Ok(OperandSpec::GenericRegister(0));
            }
            return operand_width(bits)
                .map(OperandSpec::GenericRegister)
                .ok_or_else(unsupported);
        }
        if t == "m" {
            return Ok(OperandSpec::DirectMemory);
        }
        Err(unsupported())
    }
}

fn operand_width(digits: &str) -> Option<u16> {
    match digits {
        "8" => Some(8),
        "16" => Some(16),
        "32" => Some(32),
        "64" => Some(64),
        _ => None,
    }
}

impl fmt::Display for OperandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandSpec::Immediate(bits) => write!(f, "imm{}", bits),
            OperandSpec::Relative(bits) => write!(f, "rel{}", bits),
            OperandSpec::FixedOperand(tok) => f.write_str(tok),
            OperandSpec::GenericRegister(0) => f.write_str("r"),
            OperandSpec::GenericRegister(bits) => write!(f, "r{}", bits),
            OperandSpec::RegisterOrMemory(bits) => write!(f, "r/m{}", bits),
            OperandSpec::DirectMemory => f.write_str("m"),
        }
    }
}

/// One element of a compiled opcode program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpcodePart {
    /// A literal byte.
    Byte(u8),
    /// `+rb`/`+rw`/`+rd`: the byte with the register field added to its low 3 bits.
    RegisterFill(u8),
    /// `/0`..`/7`: the ModR/M reg field is this constant.
    RegField(u8),
    /// A REX prefix is required here; `w` selects REX.W.
    Rex { w: bool },
    /// `ib`/`iw`/`id`/`io`: an immediate of the given bit width.
    Immediate(u16),
    /// `cb`/`cw`/`cd`: a relative offset of the given bit width.
    Relative(u16),
}

impl OpcodePart {
    fn parse(tok: &str) -> Result<Option<OpcodePart>, RowRejection> {
        let malformed = || RowRejection::MalformedOpcode(tok.to_string());
        let part = match tok {
            "REX" => OpcodePart::Rex { w: false },
            "REX.W" => OpcodePart::Rex { w: true },
            "/r" => return Ok(None),
            "ib" => OpcodePart::Immediate(8),
            "iw" => OpcodePart::Immediate(16),
            "id" => OpcodePart::Immediate(32),
            "io" => OpcodePart::Immediate(64),
            "cb" => OpcodePart::Relative(8),
            "cw" => OpcodePart::Relative(16),
            "cd" => OpcodePart::Relative(32),
            _ => {
                if let Some(digit) = tok.strip_prefix('/') {
                    return match digit.as_bytes() {
                        [d @ b'0'..=b'7'] => Ok(Some(OpcodePart::RegField(d - b'0'))),
                        _ => Err(malformed()),
                    };
                }
                if tok.ends_with("+i") {
                    return Err(RowRejection::UnsupportedEncoding(tok.to_string()));
                }
                if let Some((byte, size)) = tok.split_once("+r") {
                    if !matches!(size, "b" | "w" | "d" | "o") {
                        return Err(malformed());
                    }
                    let byte = parse_hex_byte(byte).ok_or_else(malformed)?;
                    OpcodePart::RegisterFill(byte)
                } else {
                    OpcodePart::Byte(parse_hex_byte(tok).ok_or_else(malformed)?)
                }
            }
        };
        Ok(Some(part))
    }
}

fn parse_hex_byte(s: &str) -> Option<u8> {
    if s.len() != 2 {
        return None;
    }
    u8::from_str_radix(s, 16).ok()
}

impl fmt::Display for OpcodePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpcodePart::Byte(b) => write!(f, "{:02X}", b),
            OpcodePart::RegisterFill(b) => write!(f, "{:02X}+r", b),
            OpcodePart::RegField(d) => write!(f, "/{}", d),
            OpcodePart::Rex { w: false } => f.write_str("REX"),
            OpcodePart::Rex { w: true } => f.write_str("REX.W"),
            OpcodePart::Immediate(bits) => f.write_str(match bits {
                8 => "ib",
                16 => "iw",
                32 => "id",
                _ => "io",
            }),
            OpcodePart::Relative(bits) => f.write_str(match bits {
                8 => "cb",
                16 => "cw",
                _ => "cd",
            }),
        }
    }
}

/// One instruction form: mnemonic, operand kinds, and opcode program.
///
/// Immutable once compiled; only [`compile_row`] constructs it, so every
/// template satisfies the operand/program consistency checks made there.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstructionTemplate {
    mnemonic: String,
    operands: Vec<OperandSpec>,
    program: Vec<OpcodePart>,
    operand_size_prefix: bool,
}

impl InstructionTemplate {
    /// Lowercase mnemonic.
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// The 0, 1 or 2 operand kinds, in declaration order.
    pub fn operands(&self) -> &[OperandSpec] {
        &self.operands
    }

    /// The compiled opcode program, in emission order.
    pub fn program(&self) -> &[OpcodePart] {
        &self.program
    }

    /// Whether the legacy `66` operand-size prefix is emitted first.
    pub fn operand_size_prefix(&self) -> bool {
        self.operand_size_prefix
    }

    /// The constant ModR/M reg field from a `/digit` marker, if any.
    pub fn reg_digit(&self) -> Option<u8> {
        self.program.iter().find_map(|p| match p {
            OpcodePart::RegField(d) => Some(*d),
            _ => None,
        })
    }

    /// Whether the opcode program places a REX prefix explicitly.
    pub fn has_rex_marker(&self) -> bool {
        self.program
            .iter()
            .any(|p| matches!(p, OpcodePart::Rex { .. }))
    }

    /// Whether the register operand is encoded in the opcode byte.
    pub fn has_register_fill(&self) -> bool {
        self.program
            .iter()
            .any(|p| matches!(p, OpcodePart::RegisterFill(_)))
    }

    /// Whether one operand goes through the ModR/M r/m field.
    pub fn has_addressing_operand(&self) -> bool {
        self.operands.iter().any(OperandSpec::is_addressing)
    }
}

impl fmt::Display for InstructionTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mnemonic)?;
        for (i, op) in self.operands.iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            write!(f, "{}", op)?;
        }
        f.write_str(" [")?;
        if self.operand_size_prefix {
            f.write_str("66 ")?;
        }
        for (i, part) in self.program.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", part)?;
        }
        f.write_str("]")
    }
}

/// Compile one ISA table row into an [`InstructionTemplate`].
///
/// # Errors
///
/// Returns the [`RowRejection`] explaining why the row is not modeled.
pub fn compile_row(syntax: &str, opcode: &str) -> Result<InstructionTemplate, RowRejection> {
    let opcode = opcode.split_whitespace().collect::<Vec<_>>().join(" ");
    check_encoding_form(&opcode)?;

    let fields: Vec<&str> = syntax
        .split([',', ' '])
        .filter(|f| !f.is_empty())
        .collect();
    if fields.len() > 3 {
        return Err(RowRejection::TooManyFields(fields.len()));
    }

    let override_name = OPCODE_NAME_OVERRIDES
        .iter()
        .find(|(pattern, _)| *pattern == opcode)
        .map(|(_, name)| *name);

    let (mnemonic, operand_fields) = match (override_name, fields.split_first()) {
        // the syntax column may hold only operands for overridden rows
        (Some(name), Some((first, rest))) => {
            if OperandSpec::classify(first).is_ok() {
                (name.to_string(), &fields[..])
            } else {
                (name.to_string(), rest)
            }
        }
        (Some(name), None) => (name.to_string(), &fields[..]),
        (None, Some((first, rest))) => (first.to_ascii_lowercase(), rest),
        (None, None) => return Err(RowRejection::MissingMnemonic),
    };
    if operand_fields.len() > 2 {
        return Err(RowRejection::TooManyFields(operand_fields.len() + 1));
    }

    let operands = operand_fields
        .iter()
        .map(|f| OperandSpec::classify(f))
        .collect::<Result<Vec<_>, _>>()?;
    let program = parse_program(&opcode)?;
    validate(&operands, &program)?;

    let operand_size_prefix =
        wants_operand_size_prefix(&operands) && program.first() != Some(&OpcodePart::Byte(0x66));
    if max_encoded_len(&operands, &program, operand_size_prefix) > MAX_INSTRUCTION_LEN {
        return Err(RowRejection::InconsistentRow(
            "encoding can exceed the 15-byte instruction limit",
        ));
    }

    Ok(InstructionTemplate {
        mnemonic,
        operands,
        program,
        operand_size_prefix,
    })
}

fn check_encoding_form(opcode: &str) -> Result<(), RowRejection> {
    for marker in ["VEX", "XOP"] {
        if opcode.contains(marker) {
            return Err(RowRejection::UnsupportedEncoding(marker.to_string()));
        }
    }
    if let Some(tok) = opcode
        .split(' ')
        .find(|t| matches!(*t, "NP" | "NFx"))
    {
        return Err(RowRejection::UnsupportedEncoding(tok.to_string()));
    }
    Ok(())
}

/// Normalize the opcode text (`REX.W +` → `REX.W`, `B8 +rd`/`B8+ rd` → `B8+rd`,
/// `C7/0` → `C7 /0`) and parse it into a program.
fn parse_program(opcode: &str) -> Result<Vec<OpcodePart>, RowRejection> {
    let text = opcode
        .replace("REX.W +", "REX.W")
        .replace("REX +", "REX")
        .replace(" +r", "+r")
        .replace("+ r", "+r")
        .replace('/', " /");

    let mut program = Vec::new();
    for tok in text.split_whitespace() {
        if let Some(part) = OpcodePart::parse(tok)? {
            program.push(part);
        }
    }
    Ok(program)
}

fn validate(operands: &[OperandSpec], program: &[OpcodePart]) -> Result<(), RowRejection> {
    let count = |pred: fn(&OpcodePart) -> bool| program.iter().filter(|p| pred(p)).count();

    if !program
        .iter()
        .any(|p| matches!(p, OpcodePart::Byte(_) | OpcodePart::RegisterFill(_)))
    {
        return Err(RowRejection::InconsistentRow("opcode program has no opcode byte"));
    }
    if count(|p| matches!(p, OpcodePart::Rex { .. })) > 1 {
        return Err(RowRejection::InconsistentRow("more than one REX marker"));
    }
    if count(|p| matches!(p, OpcodePart::RegField(_))) > 1 {
        return Err(RowRejection::InconsistentRow("more than one /digit marker"));
    }
    if count(|p| matches!(p, OpcodePart::RegisterFill(_))) > 1 {
        return Err(RowRejection::InconsistentRow("more than one +r marker"));
    }

    let registers = operands
        .iter()
        .filter(|o| matches!(o, OperandSpec::GenericRegister(_)))
        .count();
    let addressing = operands.iter().filter(|o| o.is_addressing()).count();
    if registers > 1 || addressing > 1 {
        return Err(RowRejection::InconsistentRow(
            "more than one register or r/m operand",
        ));
    }
    if registers == 0 && count(|p| matches!(p, OpcodePart::RegisterFill(_))) > 0 {
        return Err(RowRejection::InconsistentRow("+r marker without a register operand"));
    }

    let digit = count(|p| matches!(p, OpcodePart::RegField(_))) > 0;
    let fill = count(|p| matches!(p, OpcodePart::RegisterFill(_))) > 0;
    if registers == 1 && !fill && !digit && addressing == 0 {
        return Err(RowRejection::InconsistentRow(
            "register operand has no ModR/M or opcode slot",
        ));
    }
    if registers == 1 && digit && addressing == 1 {
        return Err(RowRejection::InconsistentRow(
            "/digit leaves no ModR/M field for the register operand",
        ));
    }

    // immediate-like operands pair up with placeholders in declaration order,
    // kind and width both
    let mut placeholders = program.iter().filter_map(|p| match p {
        OpcodePart::Immediate(bits) => Some((false, *bits)),
        OpcodePart::Relative(bits) => Some((true, *bits)),
        _ => None,
    });
    for op in operands {
        let slot = match op {
            OperandSpec::Immediate(bits) => (false, *bits),
            OperandSpec::Relative(bits) => (true, *bits),
            _ => continue,
        };
        if placeholders.next() != Some(slot) {
            return Err(RowRejection::InconsistentRow(
                "immediate operands do not match opcode placeholders",
            ));
        }
    }
    if placeholders.next().is_some() {
        return Err(RowRejection::InconsistentRow(
            "opcode placeholder without an immediate operand",
        ));
    }
    Ok(())
}

/// Upper bound on the bytes `emit` can produce for a row: prefixes, a forced
/// REX, ModR/M, SIB and disp32 are all counted whenever the operands allow them.
fn max_encoded_len(operands: &[OperandSpec], program: &[OpcodePart], prefix_66: bool) -> usize {
    let addressing = operands.iter().any(OperandSpec::is_addressing);
    let mut len = usize::from(prefix_66);
    if addressing {
        // 67, SIB and disp32
        len += 1 + 1 + 4;
    }
    let registers = addressing
        || operands
            .iter()
            .any(|o| matches!(o, OperandSpec::GenericRegister(_)));
    if registers && !program.iter().any(|p| matches!(p, OpcodePart::Rex { .. })) {
        len += 1;
    }
    let mut modrm = addressing;
    for part in program {
        len += match part {
            OpcodePart::Byte(_) | OpcodePart::RegisterFill(_) | OpcodePart::Rex { .. } => 1,
            OpcodePart::RegField(_) => {
                modrm = true;
                0
            }
            OpcodePart::Immediate(bits) | OpcodePart::Relative(bits) => usize::from(*bits / 8),
        };
    }
    len + usize::from(modrm)
}

/// 16-bit operation size, decided by the first register or r/m operand, or by
/// an explicit `ax` operand.
fn wants_operand_size_prefix(operands: &[OperandSpec]) -> bool {
    if operands
        .iter()
        .any(|o| matches!(o, OperandSpec::FixedOperand(t) if t == "ax"))
    {
        return true;
    }
    operands
        .iter()
        .find_map(|o| match o {
            OperandSpec::GenericRegister(bits) | OperandSpec::RegisterOrMemory(bits) => {
                Some(*bits == 16)
            }
            _ => None,
        })
        .unwrap_or(false)
}

/// The compiled, immutable template set, in table order.
///
/// Table order is significant: it is the tie-break between equally short
/// encodings.
#[derive(Debug, Clone, Default)]
pub struct TemplateTable {
    templates: Vec<InstructionTemplate>,
    rejected: usize,
}

impl TemplateTable {
    /// Compile `(syntax, opcode)` rows, dropping the ones that are not modeled.
    pub fn compile<I, S, O>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, O)>,
        S: AsRef<str>,
        O: AsRef<str>,
    {
        let mut table = TemplateTable::default();
        for (syntax, opcode) in rows {
            let (syntax, opcode) = (syntax.as_ref(), opcode.as_ref());
            match compile_row(syntax, opcode) {
                Ok(template) => table.templates.push(template),
                Err(why) => {
                    log::debug!("dropping ISA row `{}` / `{}`: {}", syntax, opcode, why);
                    table.rejected += 1;
                }
            }
        }
        log::debug!(
            "compiled {} instruction templates ({} rows dropped)",
            table.templates.len(),
            table.rejected
        );
        table
    }

    /// Compile the built-in general-purpose row set.
    pub fn builtin() -> Self {
        TemplateTable::compile(crate::table::X86_64_ROWS.iter().copied())
    }

    /// All templates in table order.
    pub fn templates(&self) -> &[InstructionTemplate] {
        &self.templates
    }

    /// Template at `index`.
    pub fn get(&self, index: usize) -> Option<&InstructionTemplate> {
        self.templates.get(index)
    }

    /// Number of compiled templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether no template survived compilation.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Number of rows dropped during compilation.
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}
