use crate::rom::Rom;

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_STARTING_ADDRESS: u16 = 0x200;

pub const FONT_STARTING_ADDRESS: u16 = 0x50; // font lives at 0x50..=0x9F
pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Allocates the 4 KiB address space with the font image and the program
/// image placed at their fixed addresses. The returned buffer is owned by
/// the host; the monitor borrows it mutably while active and everything
/// else only reads it.
pub fn allocate_memory(rom: &Rom) -> Vec<u8> {
    let mut memory = vec![0; MEMORY_SIZE];

    let font_start = FONT_STARTING_ADDRESS as usize;
    memory[font_start..font_start + FONT.len()].copy_from_slice(&FONT);

    let program_start = PROGRAM_STARTING_ADDRESS as usize;
    memory[program_start..program_start + rom.data.len()].copy_from_slice(&rom.data);

    memory
}
