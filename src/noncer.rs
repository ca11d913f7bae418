//! Random nonce generation.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::RngCore;

/// Provides random nonce strings, one per signed request.
///
/// Nonces must be uniformly random; uniqueness across the
/// timestamp/consumer/token triple is the server's property to enforce, not
/// the noncer's. The built-in noncers read the operating system RNG on every
/// call and are safe to share between threads; custom implementations must
/// document their thread-safety.
pub trait Noncer: Send + Sync {
    fn nonce(&self) -> String;
}

/// Adapter letting any `Fn() -> String` act as a [`Noncer`]; handy for
/// pinning the nonce in tests.
pub struct NoncerFn<F>(pub F);

impl<F> Noncer for NoncerFn<F>
where
    F: Fn() -> String + Send + Sync,
{
    fn nonce(&self) -> String {
        (self.0)()
    }
}

/// [`Noncer`] returning `length` random bytes as standard base64.
#[derive(Debug, Clone, Copy)]
pub struct Base64Noncer {
    length: usize,
}

impl Base64Noncer {
    pub fn new(length: usize) -> Self {
        Base64Noncer { length }
    }
}

impl Default for Base64Noncer {
    /// 32 random bytes, the default for outbound requests.
    fn default() -> Self {
        Base64Noncer { length: 32 }
    }
}

impl Noncer for Base64Noncer {
    fn nonce(&self) -> String {
        BASE64.encode(random_bytes(self.length))
    }
}

/// [`Noncer`] returning `length` random bytes as lowercase hex.
#[derive(Debug, Clone, Copy)]
pub struct HexNoncer {
    length: usize,
}

impl HexNoncer {
    pub fn new(length: usize) -> Self {
        HexNoncer { length }
    }
}

impl Default for HexNoncer {
    fn default() -> Self {
        HexNoncer { length: 16 }
    }
}

impl Noncer for HexNoncer {
    fn nonce(&self) -> String {
        random_bytes(self.length)
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }
}

fn random_bytes(length: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; length];
    rand::rng().fill_bytes(&mut bytes);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_noncer_length_and_freshness() {
        let noncer = Base64Noncer::default();
        let a = noncer.nonce();
        let b = noncer.nonce();
        // 32 bytes -> 44 base64 characters
        assert_eq!(a.len(), 44);
        assert_ne!(a, b);
    }

    #[test]
    fn hex_noncer_length_and_alphabet() {
        let nonce = HexNoncer::default().nonce();
        assert_eq!(nonce.len(), 32);
        assert!(nonce.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn closure_noncer() {
        let fixed = NoncerFn(|| "some_nonce".to_string());
        assert_eq!(fixed.nonce(), "some_nonce");
    }
}
