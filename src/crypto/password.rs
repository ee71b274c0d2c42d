use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

#[cfg(not(test))]
pub const PBKDF2_ITERATIONS: u32 = 210_000;
#[cfg(test)]
pub const PBKDF2_ITERATIONS: u32 = 1_000;
pub const HASH_LENGTH: usize = 32;
pub const SALT_LENGTH: usize = 16;

/// Salted PBKDF2-HMAC-SHA256 password hash.
#[derive(Clone)]
pub struct PasswordHash {
    salt: [u8; SALT_LENGTH],
    hash: [u8; HASH_LENGTH],
}

impl PasswordHash {
    /// Hash a password under a fresh random salt.
    pub fn new(password: &str) -> Self {
        Self::with_salt(password, generate_salt())
    }

    pub fn with_salt(password: &str, salt: [u8; SALT_LENGTH]) -> Self {
        let mut hash = [0u8; HASH_LENGTH];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut hash);
        Self { salt, hash }
    }

    /// Constant-time comparison against a candidate password.
    pub fn verify(&self, password: &str) -> bool {
        let candidate = Self::with_salt(password, self.salt);
        candidate.hash.ct_eq(&self.hash).into()
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Generate a cryptographically random salt
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}
