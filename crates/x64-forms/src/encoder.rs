//! Encoding emitter: renders a matched template into machine code.
//!
//! Byte order within one instruction is fixed:
//!
//! ```text
//! [66] [67] [legacy bytes from the program] [REX] opcode... [ModRM [SIB] [disp]] [imm/rel]...
//! ```

use alloc::vec::Vec;
use core::fmt;

use crate::matcher::{Addressing, Captures, Mod};
use crate::register::Register;
use crate::template::{InstructionTemplate, OpcodePart, MAX_INSTRUCTION_LEN};

const CAPACITY: usize = MAX_INSTRUCTION_LEN;

/// Bytes of one encoded instruction, held inline.
///
/// Sized to the 15-byte instruction limit that the template compiler
/// enforces on every row, so emitting a compiled template never outgrows it.
#[derive(Clone, Copy)]
pub struct InstrBytes {
    data: [u8; CAPACITY],
    len: u8,
}

impl InstrBytes {
    /// An empty instruction.
    #[inline]
    pub const fn new() -> Self {
        Self {
            data: [0; CAPACITY],
            len: 0,
        }
    }

    /// Append one byte.
    ///
    /// # Panics
    ///
    /// Panics past 15 bytes, which only a hand-built buffer can reach.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        assert!(
            (self.len as usize) < CAPACITY,
            "instruction longer than {} bytes",
            MAX_INSTRUCTION_LEN
        );
        self.data[self.len as usize] = byte;
        self.len += 1;
    }

    /// Append `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if the result would be longer than 15 bytes.
    #[inline]
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        let start = self.len as usize;
        let end = start + bytes.len();
        assert!(
            end <= CAPACITY,
            "instruction longer than {} bytes ({} + {})",
            MAX_INSTRUCTION_LEN,
            start,
            bytes.len()
        );
        self.data[start..end].copy_from_slice(bytes);
        self.len = end as u8;
    }

    /// Encoded length so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether nothing has been emitted yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copy the bytes out.
    #[inline]
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_ref().to_vec()
    }
}

impl Default for InstrBytes {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl core::ops::Deref for InstrBytes {
    type Target = [u8];
    #[inline]
    fn deref(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }
}

impl AsRef<[u8]> for InstrBytes {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self
    }
}

impl fmt::Debug for InstrBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for InstrBytes {
    /// Space separated uppercase hex, e.g. `B8 05 00 00 00`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}

impl PartialEq for InstrBytes {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl Eq for InstrBytes {}

impl PartialEq<[u8]> for InstrBytes {
    fn eq(&self, other: &[u8]) -> bool {
        **self == *other
    }
}

impl PartialEq<Vec<u8>> for InstrBytes {
    fn eq(&self, other: &Vec<u8>) -> bool {
        **self == **other
    }
}

/// One encoded statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    bytes: InstrBytes,
    template: usize,
}

impl Instruction {
    pub(crate) fn new(bytes: InstrBytes, template: usize) -> Self {
        Self { bytes, template }
    }

    /// The machine code.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Encoded length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false for an encoded instruction; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Index of the selected template in its [`TemplateTable`](crate::TemplateTable).
    pub fn template_index(&self) -> usize {
        self.template
    }

    /// Copy the bytes into a `Vec`.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes.to_vec()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.bytes, f)
    }
}

/// Build REX prefix byte.
#[inline]
pub(crate) fn rex(w: bool, r: bool, x: bool, b: bool) -> u8 {
    let mut val: u8 = 0x40;
    if w {
        val |= 0x08;
    }
    if r {
        val |= 0x04;
    }
    if x {
        val |= 0x02;
    }
    if b {
        val |= 0x01;
    }
    val
}

/// Build ModR/M byte.
#[inline]
pub(crate) fn modrm(mod_: u8, reg: u8, rm: u8) -> u8 {
    (mod_ << 6) | ((reg & 7) << 3) | (rm & 7)
}

/// SIB byte selecting `base` with no index register (`index = 100`, scale 1).
const SIB_NO_INDEX: u8 = 0x24;

fn is_legacy_prefix(b: u8) -> bool {
    matches!(
        b,
        0xF0 | 0xF2 | 0xF3 | 0x26 | 0x2E | 0x36 | 0x3E | 0x64 | 0x65 | 0x66 | 0x67
    )
}

/// Field values resolved from the template and captures before any byte is
/// written.
struct Fields {
    /// ModR/M reg field (operand register index or `/digit`).
    reg: u8,
    /// Register whose low bits are added into a `+r` opcode byte.
    opcode_reg: Option<Register>,
    /// The r/m operand; a register operand of a `/digit` form lands here too.
    addressing: Option<Addressing>,
    rex: u8,
    /// A REX byte is needed even though the program has no REX marker.
    force_rex: bool,
    modrm: bool,
}

impl Fields {
    fn resolve(template: &InstructionTemplate, caps: &Captures) -> Self {
        let digit = template.reg_digit();
        let fill = template.has_register_fill();
        let reg_operand = if fill { None } else { caps.reg() };
        let opcode_reg = if fill { caps.reg() } else { None };

        // with /digit owning the reg field, a lone register operand is r/m
        let addressing = caps.addressing().copied().or_else(|| match (digit, reg_operand) {
            (Some(_), Some(base)) => Some(Addressing {
                base,
                mode: Mod::NoDereference,
                displacement: None,
            }),
            _ => None,
        });

        let reg = match (digit, reg_operand) {
            (Some(d), _) => d,
            (None, Some(r)) => r.index(),
            (None, None) => 0,
        };

        let w = template
            .program()
            .iter()
            .any(|p| *p == OpcodePart::Rex { w: true });
        let r = digit.is_none() && reg_operand.map_or(false, Register::is_extended);
        let b = addressing.map_or(false, |a| a.base.is_extended())
            || opcode_reg.map_or(false, Register::is_extended);
        let byte_regs = caps.registers().any(Register::requires_rex_for_byte);

        Fields {
            reg,
            opcode_reg,
            addressing,
            rex: rex(w, r, false, b),
            force_rex: !template.has_rex_marker() && (r || b || byte_regs),
            modrm: addressing.is_some() || digit.is_some(),
        }
    }
}

/// Render `template` with the values in `caps`.
///
/// `caps` must come from a successful [`match_template`](crate::match_template)
/// against the same template.
pub fn emit(template: &InstructionTemplate, caps: &Captures) -> InstrBytes {
    let fields = Fields::resolve(template, caps);
    let mut buf = InstrBytes::new();

    if template.operand_size_prefix() {
        buf.push(0x66);
    }
    if fields
        .addressing
        .map_or(false, |a| a.is_memory() && a.base.size_bits() == 32)
    {
        buf.push(0x67);
    }

    let mut rex_pending = fields.force_rex;
    let mut modrm_pending = fields.modrm;
    let mut immediates = caps.immediates().iter();

    for part in template.program() {
        match *part {
            OpcodePart::Byte(byte) => {
                if rex_pending && !is_legacy_prefix(byte) {
                    buf.push(fields.rex);
                    rex_pending = false;
                }
                buf.push(byte);
            }
            OpcodePart::RegisterFill(byte) => {
                if rex_pending {
                    buf.push(fields.rex);
                    rex_pending = false;
                }
                let low = fields.opcode_reg.map_or(0, |r| r.index() & 7);
                buf.push((byte & !7) | low);
            }
            OpcodePart::Rex { .. } => buf.push(fields.rex),
            // folded into Fields::reg
            OpcodePart::RegField(_) => {}
            OpcodePart::Immediate(bits) | OpcodePart::Relative(bits) => {
                if modrm_pending {
                    push_modrm(&mut buf, fields.reg, fields.addressing.as_ref());
                    modrm_pending = false;
                }
                let value = immediates.next().copied().unwrap_or(0);
                buf.extend_from_slice(&value.to_le_bytes()[..usize::from(bits / 8)]);
            }
        }
    }
    if modrm_pending {
        push_modrm(&mut buf, fields.reg, fields.addressing.as_ref());
    }
    buf
}

/// ModR/M, optional SIB, and displacement for the r/m operand.
fn push_modrm(buf: &mut InstrBytes, reg: u8, addressing: Option<&Addressing>) {
    let Some(a) = addressing else {
        // operand-less /digit form: rm mirrors the digit
        buf.push(modrm(Mod::NoDereference.bits(), reg, reg));
        return;
    };
    if !a.is_memory() {
        buf.push(modrm(Mod::NoDereference.bits(), reg, a.base.index()));
        return;
    }

    let disp = a.displacement.unwrap_or(0);
    if a.base == Register::Rip {
        buf.push(modrm(Mod::NoOffset.bits(), reg, 0b101));
        buf.extend_from_slice(&disp.to_le_bytes());
        return;
    }

    let rm = a.base.index() & 7;
    let mut mode = Mod::for_displacement(disp);
    // mod=00 rm=101 means RIP-relative, so [rbp]/[r13] needs an explicit disp8
    if mode == Mod::NoOffset && rm == 0b101 {
        mode = Mod::Offset8Bit;
    }
    buf.push(modrm(mode.bits(), reg, rm));
    // rm=100 escapes to a SIB byte for rsp/r12
    if rm == 0b100 {
        buf.push(SIB_NO_INDEX);
    }
    match mode {
        Mod::Offset8Bit => buf.push(disp as i8 as u8),
        Mod::Offset32Bit => buf.extend_from_slice(&disp.to_le_bytes()),
        Mod::NoOffset | Mod::NoDereference => {}
    }
}
