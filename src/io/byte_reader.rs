use crate::core::error::{DwgError, ErrorKind};
use crate::core::result::Result;

#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn tell(&self) -> u64 {
        self.pos as u64
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_rc(&mut self) -> Result<u8> {
        let bytes = self.read_rcs(1)?;
        Ok(bytes[0])
    }

    pub fn read_rs(&mut self) -> Result<u16> {
        let bytes = self.read_rcs(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_rl(&mut self) -> Result<u32> {
        let bytes = self.read_rcs(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_rd(&mut self) -> Result<f64> {
        let bytes = self.read_rcs(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(f64::from_le_bytes(raw))
    }

    pub fn read_3rd(&mut self) -> Result<(f64, f64, f64)> {
        Ok((self.read_rd()?, self.read_rd()?, self.read_rd()?))
    }

    pub fn read_rcs(&mut self, count: usize) -> Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(DwgError::new(
                ErrorKind::Decode,
                format!(
                    "unexpected end of data: need {count} bytes, {} remaining",
                    self.remaining()
                ),
            )
            .with_offset(self.tell()));
        }
        let out = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(out)
    }
}
