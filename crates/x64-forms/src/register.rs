//! General-purpose x86-64 registers.
//!
//! Names are partitioned into width classes (8/16/32/64 bits). A name belongs
//! to exactly one class; lookups are only ever made against a single class,
//! or against all of them when the caller accepts any width.

/// An x86-64 general-purpose register, plus `RIP` for RIP-relative addressing.
///
/// Each variant carries its own width (see [`Register::size_bits`]) and 4-bit
/// hardware index (see [`Register::index`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Register {
    // -- 64-bit --
    Rax,
    Rcx,
    Rdx,
    Rbx,
    Rsp,
    Rbp,
    Rsi,
    Rdi,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    R15,
    // -- 32-bit --
    Eax,
    Ecx,
    Edx,
    Ebx,
    Esp,
    Ebp,
    Esi,
    Edi,
    R8d,
    R9d,
    R10d,
    R11d,
    R12d,
    R13d,
    R14d,
    R15d,
    // -- 16-bit --
    Ax,
    Cx,
    Dx,
    Bx,
    Sp,
    Bp,
    Si,
    Di,
    R8w,
    R9w,
    R10w,
    R11w,
    R12w,
    R13w,
    R14w,
    R15w,
    // -- 8-bit --
    Al,
    Cl,
    Dl,
    Bl,
    Spl,
    Bpl,
    Sil,
    Dil,
    Ah,
    Ch,
    Dh,
    Bh,
    R8b,
    R9b,
    R10b,
    R11b,
    R12b,
    R13b,
    R14b,
    R15b,
    /// Instruction pointer; only valid as a memory base.
    Rip,
}

/// All general-purpose registers, grouped by width class.
const GP_REGISTERS: [Register; 68] = {
    use Register::*;
    [
        Rax, Rcx, Rdx, Rbx, Rsp, Rbp, Rsi, Rdi, R8, R9, R10, R11, R12, R13, R14, R15, //
        Eax, Ecx, Edx, Ebx, Esp, Ebp, Esi, Edi, R8d, R9d, R10d, R11d, R12d, R13d, R14d, R15d, //
        Ax, Cx, Dx, Bx, Sp, Bp, Si, Di, R8w, R9w, R10w, R11w, R12w, R13w, R14w, R15w, //
        Al, Cl, Dl, Bl, Spl, Bpl, Sil, Dil, Ah, Ch, Dh, Bh, R8b, R9b, R10b, R11b, R12b, R13b,
        R14b, R15b,
    ]
};

/// Lowercase `s` into `buf` without allocating. Register names are short, so
/// anything longer than the buffer cannot be a register anyway.
fn to_lower_buf<'b>(s: &str, buf: &'b mut [u8]) -> Option<&'b str> {
    if s.len() > buf.len() {
        return None;
    }
    let buf = &mut buf[..s.len()];
    buf.copy_from_slice(s.as_bytes());
    buf.make_ascii_lowercase();
    core::str::from_utf8(buf).ok()
}

impl Register {
    /// Look up a general-purpose register by name, case-insensitively.
    ///
    /// `rip` is not a general-purpose register and is not returned here;
    /// see [`Register::memory_base`].
    pub fn from_name(name: &str) -> Option<Register> {
        let mut buf = [0u8; 8];
        let name = to_lower_buf(name, &mut buf)?;
        GP_REGISTERS.iter().copied().find(|r| r.name() == name)
    }

    /// Look up a register in the width class `bits`; `0` accepts any width.
    pub fn with_width(name: &str, bits: u16) -> Option<Register> {
        Register::from_name(name).filter(|r| bits == 0 || r.size_bits() == bits)
    }

    /// Look up a register usable as a memory base: any general-purpose
    /// register or `rip`.
    pub fn memory_base(name: &str) -> Option<Register> {
        if name.eq_ignore_ascii_case("rip") {
            return Some(Register::Rip);
        }
        Register::from_name(name)
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        use Register::*;
        match self {
            Rax => "rax",
            Rcx => "rcx",
            Rdx => "rdx",
            Rbx => "rbx",
            Rsp => "rsp",
            Rbp => "rbp",
            Rsi => "rsi",
            Rdi => "rdi",
            R8 => "r8",
            R9 => "r9",
            R10 => "r10",
            R11 => "r11",
            R12 => "r12",
            R13 => "r13",
            R14 => "r14",
            R15 => "r15",
            Eax => "eax",
            Ecx => "ecx",
            Edx => "edx",
            Ebx => "ebx",
            Esp => "esp",
            Ebp => "ebp",
            Esi => "esi",
            Edi => "edi",
            R8d => "r8d",
            R9d => "r9d",
            R10d => "r10d",
            R11d => "r11d",
            R12d => "r12d",
            R13d => "r13d",
            R14d => "r14d",
            R15d => "r15d",
            Ax => "ax",
            Cx => "cx",
            Dx => "dx",
            Bx => "bx",
            Sp => "sp",
            Bp => "bp",
            Si => "si",
            Di => "di",
            R8w => "r8w",
            R9w => "r9w",
            R10w => "r10w",
            R11w => "r11w",
            R12w => "r12w",
            R13w => "r13w",
            R14w => "r14w",
            R15w => "r15w",
            Al => "al",
            Cl => "cl",
            Dl => "dl",
            Bl => "bl",
            Spl => "spl",
            Bpl => "bpl",
            Sil => "sil",
            Dil => "dil",
            Ah => "ah",
            Ch => "ch",
            Dh => "dh",
            Bh => "bh",
            R8b => "r8b",
            R9b => "r9b",
            R10b => "r10b",
            R11b => "r11b",
            R12b => "r12b",
            R13b => "r13b",
            R14b => "r14b",
            R15b => "r15b",
            Rip => "rip",
        }
    }

    /// 4-bit hardware index. The low 3 bits go into ModR/M or the opcode
    /// byte; bit 3 is carried by a REX extension bit.
    pub fn index(self) -> u8 {
        use Register::*;
        match self {
            Rax | Eax | Ax | Al => 0,
            Rcx | Ecx | Cx | Cl => 1,
            Rdx | Edx | Dx | Dl => 2,
            Rbx | Ebx | Bx | Bl => 3,
            Rsp | Esp | Sp | Spl | Ah => 4,
            Rbp | Ebp | Bp | Bpl | Ch => 5,
            Rsi | Esi | Si | Sil | Dh => 6,
            Rdi | Edi | Di | Dil | Bh => 7,
            R8 | R8d | R8w | R8b => 8,
            R9 | R9d | R9w | R9b => 9,
            R10 | R10d | R10w | R10b => 10,
            R11 | R11d | R11w | R11b => 11,
            R12 | R12d | R12w | R12b => 12,
            R13 | R13d | R13w | R13b => 13,
            R14 | R14d | R14w | R14b => 14,
            R15 | R15d | R15w | R15b => 15,
            // mod=00 r/m=101 selects RIP-relative addressing
            Rip => 5,
        }
    }

    /// Width class in bits.
    pub fn size_bits(self) -> u16 {
        match self as u8 {
            0..=15 => 64,
            16..=31 => 32,
            32..=47 => 16,
            48..=67 => 8,
            _ => 64,
        }
    }

    /// Whether bit 3 of the index is set (R8–R15 in any width).
    pub fn is_extended(self) -> bool {
        self.index() >= 8
    }

    /// `SPL`, `BPL`, `SIL`, `DIL` are only addressable with a REX prefix.
    pub fn requires_rex_for_byte(self) -> bool {
        use Register::*;
        matches!(self, Spl | Bpl | Sil | Dil)
    }

    /// `AH`, `CH`, `DH`, `BH` cannot be addressed when a REX prefix is present.
    pub fn is_high_byte(self) -> bool {
        use Register::*;
        matches!(self, Ah | Ch | Dh | Bh)
    }
}

impl core::fmt::Display for Register {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
