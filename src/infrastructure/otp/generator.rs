//! OTP code generation
//!
//! Generates short numeric codes and hashes them for storage.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::Rng;
use sha2::{Digest, Sha256};

/// Result of generating a new OTP code
#[derive(Debug, Clone)]
pub struct GeneratedOtp {
    /// The plain code (only exists long enough to be emailed)
    pub code: String,
    /// The hashed code for storage
    pub hash: String,
}

/// Generator for numeric OTP codes
#[derive(Debug, Clone)]
pub struct OtpGenerator {
    /// Number of digits in generated codes
    digits: u32,
}

impl OtpGenerator {
    /// Create a generator producing codes of the given length
    pub fn new(digits: u32) -> Self {
        Self { digits }
    }

    /// Generate a new code with its storage hash
    pub fn generate(&self) -> GeneratedOtp {
        let upper = 10u64.pow(self.digits);
        let value = rand::thread_rng().gen_range(0..upper);
        let code = format!("{:0width$}", value, width = self.digits as usize);
        let hash = self.hash_code(&code);

        GeneratedOtp { code, hash }
    }

    /// Hash a code for storage
    pub fn hash_code(&self, code: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(code.as_bytes());
        let result = hasher.finalize();
        format!("sha256${}", URL_SAFE_NO_PAD.encode(result))
    }

    /// Verify a code against a stored hash
    pub fn verify_code(&self, code: &str, stored_hash: &str) -> bool {
        let computed = self.hash_code(code);
        constant_time_compare(&computed, stored_hash)
    }
}

impl Default for OtpGenerator {
    fn default() -> Self {
        Self::new(6)
    }
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut result = 0u8;

    for i in 0..a.len() {
        result |= a_bytes[i] ^ b_bytes[i];
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_length() {
        let generator = OtpGenerator::default();
        let otp = generator.generate();

        assert_eq!(otp.code.len(), 6);
        assert!(otp.code.chars().all(|c| c.is_ascii_digit()));
        assert!(otp.hash.starts_with("sha256$"));
    }

    #[test]
    fn test_zero_padding() {
        // A 1-digit generator makes leading-zero collisions likely enough to
        // exercise the padding path deterministically via hash round-trip
        let generator = OtpGenerator::new(8);
        let otp = generator.generate();

        assert_eq!(otp.code.len(), 8);
    }

    #[test]
    fn test_verify_code() {
        let generator = OtpGenerator::default();
        let otp = generator.generate();

        assert!(generator.verify_code(&otp.code, &otp.hash));
        assert!(!generator.verify_code("000000", &otp.hash) || otp.code == "000000");
    }

    #[test]
    fn test_hash_deterministic() {
        let generator = OtpGenerator::default();

        assert_eq!(generator.hash_code("123456"), generator.hash_code("123456"));
        assert_ne!(generator.hash_code("123456"), generator.hash_code("654321"));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("hello", "hello"));
        assert!(!constant_time_compare("hello", "world"));
        assert!(!constant_time_compare("hello", "hell"));
    }
}
