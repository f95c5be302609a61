//! Certificate number generation
//!
//! Generates the public, human-readable numbers printed on certificates.

use rand::Rng;

/// Alphabet without easily-confused characters (no 0/O, 1/I/L)
const ALPHABET: &[u8] = b"23456789ABCDEFGHJKMNPQRSTUVWXYZ";

/// Generator for certificate numbers
#[derive(Debug, Clone)]
pub struct CertificateNumberGenerator {
    prefix: String,
    /// Number of random characters after the prefix
    length: usize,
}

impl CertificateNumberGenerator {
    /// Create a new generator with the given prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            length: 10,
        }
    }

    /// Generate a new certificate number, e.g. `TPC-7XK2M9QRWP`
    pub fn generate(&self) -> String {
        let mut rng = rand::thread_rng();

        let random: String = (0..self.length)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();

        format!("{}{}", self.prefix, random)
    }
}

impl Default for CertificateNumberGenerator {
    fn default() -> Self {
        Self::new("TPC-")
    }
}
