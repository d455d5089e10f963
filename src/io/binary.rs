//! Little-endian primitives of the board file format.
//!
//! Strings are a 7-bit variable-length byte count (low groups first, high bit set on
//! every byte but the last) followed by that many UTF-8 bytes.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::{
    error::{Error, Result},
    geom::Position,
};

/// Refuse absurd string lengths instead of allocating them.
const MAX_STRING_LEN: usize = 1 << 24;

pub trait ReadExt: Read {
    fn read_int(&mut self) -> Result<i32> {
        Ok(self.read_i32::<LittleEndian>()?)
    }

    fn read_count(&mut self, what: &str) -> Result<usize> {
        let count = self.read_int()?;
        usize::try_from(count).map_err(|_| Error::format(format!("negative {what} count {count}")))
    }

    fn read_float(&mut self) -> Result<f32> {
        Ok(self.read_f32::<LittleEndian>()?)
    }

    fn read_flag(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::format(format!("invalid boolean byte {other}"))),
        }
    }

    fn read_position(&mut self) -> Result<Position> {
        let x = self.read_int()?;
        let y = self.read_int()?;
        Ok(Position::new(x, y))
    }

    fn read_string(&mut self) -> Result<String> {
        let mut len = 0usize;
        let mut shift = 0;
        loop {
            let byte = self.read_u8()?;
            len |= ((byte & 0x7f) as usize) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
            if shift > 28 {
                return Err(Error::format("string length prefix too long"));
            }
        }
        if len > MAX_STRING_LEN {
            return Err(Error::format(format!("string of {len} bytes")));
        }

        let mut bytes = vec![0; len];
        self.read_exact(&mut bytes)?;
        String::from_utf8(bytes).map_err(|_| Error::format("string is not valid UTF-8"))
    }
}

impl<R: Read + ?Sized> ReadExt for R {}

pub trait WriteExt: Write {
    fn write_int(&mut self, value: i32) -> io::Result<()> {
        self.write_i32::<LittleEndian>(value)
    }

    fn write_count(&mut self, count: usize) -> Result<()> {
        let count = i32::try_from(count)
            .map_err(|_| Error::format(format!("{count} items do not fit the format")))?;
        Ok(self.write_int(count)?)
    }

    fn write_float(&mut self, value: f32) -> io::Result<()> {
        self.write_f32::<LittleEndian>(value)
    }

    fn write_flag(&mut self, value: bool) -> io::Result<()> {
        self.write_u8(value as u8)
    }

    fn write_position(&mut self, pos: Position) -> io::Result<()> {
        self.write_int(pos.x)?;
        self.write_int(pos.y)
    }

    fn write_string(&mut self, value: &str) -> io::Result<()> {
        let mut len = value.len();
        while len >= 0x80 {
            self.write_u8((len as u8 & 0x7f) | 0x80)?;
            len >>= 7;
        }
        self.write_u8(len as u8)?;
        self.write_all(value.as_bytes())
    }
}

impl<W: Write + ?Sized> WriteExt for W {}
