use std::fmt::{self, Display, Write};

pub const MNEMONIC_MAX_LENGTH: usize = 16;

/// Bounded ASCII mnemonic buffer. Writes past capacity are clamped so
/// formatting into it can never overflow or fail.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Mnemonic {
    buf: [u8; MNEMONIC_MAX_LENGTH],
    len: u8,
}

impl Mnemonic {
    pub fn as_str(&self) -> &str {
        // only ever written through fmt::Write with ASCII content
        std::str::from_utf8(&self.buf[..self.len as usize]).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }
}

impl Write for Mnemonic {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for &byte in s.as_bytes() {
            if (self.len as usize) < MNEMONIC_MAX_LENGTH {
                self.buf[self.len as usize] = byte;
                self.len += 1;
            }
        }
        Ok(())
    }
}

impl Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Mnemonic {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Decodes the 2-byte big-endian instruction at `addr` into its mnemonic.
///
/// Total over any two in-range bytes: unassigned encodings decode to an
/// empty mnemonic instead of an error, since data-as-code regions are
/// common and must still render. Reads exactly `memory[addr]` and
/// `memory[addr + 1]`; callers must pass an even address at most
/// `memory.len() - 2`.
pub fn decode(memory: &[u8], addr: u16) -> Mnemonic {
    let mut asm = Mnemonic::default();
    write_opcode_asm(&mut asm, memory[addr as usize], memory[addr as usize + 1]).ok();
    asm
}

fn write_opcode_asm(f: &mut impl Write, hi: u8, lo: u8) -> fmt::Result {
    let opcode = (hi as u16) << 8 | lo as u16;

    let vx = hi & 0xF;
    let vy = (lo >> 4) & 0xF;
    let addr = opcode & 0xFFF;

    match hi >> 4 {
        0x0 => match opcode {
            0x00E0 => write!(f, "cls"),
            0x00EE => write!(f, "ret"),
            0x00FB => write!(f, "scr"),
            0x00FC => write!(f, "scl"),
            0x00FD => write!(f, "exit"),
            0x00FE => write!(f, "lores"),
            0x00FF => write!(f, "hires"),
            _ if lo & 0xF0 == 0xC0 => write!(f, "scd {:X}", lo & 0xF),
            _ => Ok(()),
        },
        0x1 => write!(f, "jp {:03X}", addr),
        0x2 => write!(f, "call {:03X}", addr),
        0x3 => write!(f, "se v{:X},{:02X}", vx, lo),
        0x4 => write!(f, "sne v{:X},{:02X}", vx, lo),
        0x5 => write!(f, "se v{:X},v{:X}", vx, vy),
        0x6 => write!(f, "ld v{:X},{:02X}", vx, lo),
        0x7 => write!(f, "add v{:X},{:02X}", vx, lo),
        0x8 => match lo & 0xF {
            0x0 => write!(f, "ld v{:X},v{:X}", vx, vy),
            0x1 => write!(f, "or v{:X},v{:X}", vx, vy),
            0x2 => write!(f, "and v{:X},v{:X}", vx, vy),
            0x3 => write!(f, "xor v{:X},v{:X}", vx, vy),
            0x4 => write!(f, "add v{:X},v{:X}", vx, vy),
            0x5 => write!(f, "sub v{:X},v{:X}", vx, vy),
            0x6 => write!(f, "shr v{:X},v{:X}", vx, vy),
            0x7 => write!(f, "subn v{:X},v{:X}", vx, vy),
            0xE => write!(f, "shl v{:X},v{:X}", vx, vy),
            _ => Ok(()),
        },
        0x9 => write!(f, "sne v{:X},v{:X}", vx, vy),
        0xA => write!(f, "ld i {:03X}", addr),
        0xB => write!(f, "jp v0,{:03X}", addr),
        0xC => write!(f, "rnd v{:X},{:02X}", vx, lo),
        0xD => write!(f, "drw v{:X},v{:X},{:X}", vx, vy, lo & 0xF),
        0xE => match lo {
            0x9E => write!(f, "skp v{:X}", vx),
            0xA1 => write!(f, "sknp v{:X}", vx),
            _ => Ok(()),
        },
        0xF => match lo {
            0x07 => write!(f, "ld v{:X},dt", vx),
            0x0A => write!(f, "ld v{:X},k", vx),
            0x15 => write!(f, "ld dt,v{:X}", vx),
            0x18 => write!(f, "ld st,v{:X}", vx),
            0x1E => write!(f, "add i,v{:X}", vx),
            0x29 => write!(f, "ld f,v{:X}", vx),
            0x33 => write!(f, "ld b,v{:X}", vx),
            0x55 => write!(f, "ld [i],v{:X}", vx),
            0x65 => write!(f, "ld v{:X},[i]", vx),
            _ => Ok(()),
        },
        _ => Ok(()),
    }
}
