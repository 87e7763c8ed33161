use crate::mem::{MEMORY_SIZE, PROGRAM_STARTING_ADDRESS};

use std::{ffi::OsStr, fs::read, io, path::Path};

pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_STARTING_ADDRESS as usize;

#[derive(Clone)]
pub struct Rom {
    pub name: String,
    pub data: Vec<u8>,
}

impl Rom {
    pub fn read<P: AsRef<Path>>(path: P) -> io::Result<Rom> {
        let data = read(path.as_ref())?;
        let name = path
            .as_ref()
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or("Untitled")
            .into();

        if data.len() < 2 {
            Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("ROM size ({}B) is below minimum size (2B)", data.len()),
            ))
        } else if data.len() > MAX_ROM_SIZE {
            Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "ROM size ({}B) exceeds maximum size ({}B)",
                    data.len(),
                    MAX_ROM_SIZE
                ),
            ))
        } else {
            Ok(Rom { name, data })
        }
    }
}
