//! Table driven CRC-32 as used by ZIP (and PNG, gzip): reflected polynomial
//! `0xEDB88320`, register preset to all ones and inverted at the end.

const CRC32_POLYNOMIAL: u32 = 0xEDB8_8320;

/// Lookup table for one byte at a time, generated at compile time from the polynomial.
pub const CRC32_TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 != 0 {
                CRC32_POLYNOMIAL ^ (c >> 1)
            } else {
                c >> 1
            };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

/// Incremental CRC-32.
///
/// Feeding a payload in several [`update`](Self::update) calls gives the same
/// result as a single call to [`checksum`].
#[derive(Debug, Clone, Copy)]
pub struct Hasher {
    state: u32,
}

impl Hasher {
    pub fn new() -> Self {
        Self { state: u32::MAX }
    }

    pub fn update(&mut self, buf: &[u8]) {
        let mut crc = self.state;
        for byte in buf {
            crc = CRC32_TABLE[((crc ^ *byte as u32) & 0xFF) as usize] ^ (crc >> 8);
        }
        self.state = crc;
    }

    pub fn finalize(self) -> u32 {
        !self.state
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// CRC-32 of `bytes`.
pub fn checksum(bytes: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    hasher.finalize()
}
