#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    data: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn write_rc(&mut self, value: u8) {
        self.data.push(value);
    }

    pub fn write_rcs(&mut self, values: &[u8]) {
        self.data.extend_from_slice(values);
    }

    pub fn write_rs(&mut self, value: u16) {
        self.write_rcs(&value.to_le_bytes());
    }

    pub fn write_rl(&mut self, value: u32) {
        self.write_rcs(&value.to_le_bytes());
    }

    pub fn write_rd(&mut self, value: f64) {
        self.write_rcs(&value.to_le_bytes());
    }

    pub fn write_3rd(&mut self, value: (f64, f64, f64)) {
        self.write_rd(value.0);
        self.write_rd(value.1);
        self.write_rd(value.2);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::ByteWriter;
    use crate::io::ByteReader;

    #[test]
    fn roundtrip_mixed_sequence() {
        let mut writer = ByteWriter::new();
        writer.write_rc(0x46);
        writer.write_rs(0xBEEF);
        writer.write_rl(0xA1B2_C3D4);
        writer.write_3rd((1.0, -2.0, 0.125));
        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), 1 + 2 + 4 + 24);

        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_rc().unwrap(), 0x46);
        assert_eq!(reader.read_rs().unwrap(), 0xBEEF);
        assert_eq!(reader.read_rl().unwrap(), 0xA1B2_C3D4);
        assert_eq!(reader.read_3rd().unwrap(), (1.0, -2.0, 0.125));
    }
}
