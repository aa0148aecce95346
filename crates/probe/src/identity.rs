//! Throwaway credentials for one probe run.

use rand::Rng;
use rand::seq::IndexedRandom;
use secrecy::SecretString;
use shop_probe_core::{Email, EmailError};

/// Prefix of every generated email's local part.
pub const EMAIL_PREFIX: &str = "user_";

/// Domain of every generated email.
pub const EMAIL_DOMAIN: &str = "demo.com";

/// Length of the random suffix after [`EMAIL_PREFIX`].
pub const SUFFIX_LEN: usize = 6;

/// Password shared by all generated identities.
pub const DEFAULT_PASSWORD: &str = "Test1234";

const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// An email/password pair to register and log in with.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct Identity {
    pub email: Email,
    pub password: SecretString,
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Identity {
    #[must_use]
    pub fn new(email: Email, password: impl Into<String>) -> Self {
        let password: String = password.into();
        Self {
            email,
            password: SecretString::from(password),
        }
    }

    /// Generate `user_XXXXXX@demo.com` with the default password, using the
    /// thread-local random source.
    ///
    /// # Errors
    ///
    /// Only if the generated address fails email validation, which the fixed
    /// prefix and domain rule out.
    pub fn generate() -> Result<Self, EmailError> {
        Self::generate_with(&mut rand::rng())
    }

    /// Same as [`Identity::generate`] with an explicit random source.
    ///
    /// # Errors
    ///
    /// See [`Identity::generate`].
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, EmailError> {
        let suffix = random_suffix(rng, SUFFIX_LEN);
        let email = Email::parse(&format!("{EMAIL_PREFIX}{suffix}@{EMAIL_DOMAIN}"))?;
        Ok(Self::new(email, DEFAULT_PASSWORD))
    }

    /// Nickname sent at registration: the email's local part.
    #[must_use]
    pub fn nickname(&self) -> &str {
        self.email.local_part()
    }
}

/// `len` characters drawn uniformly from `[a-z0-9]`.
fn random_suffix<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .filter_map(|_| SUFFIX_CHARSET.choose(&mut *rng).copied().map(char::from))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use secrecy::ExposeSecret;

    use super::*;

    fn assert_generated_shape(email: &str) {
        let local = email
            .strip_prefix(EMAIL_PREFIX)
            .and_then(|rest| rest.strip_suffix("@demo.com"))
            .unwrap_or_else(|| panic!("unexpected shape: {email}"));
        assert_eq!(local.len(), SUFFIX_LEN, "suffix length in {email}");
        assert!(
            local
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
            "suffix charset in {email}"
        );
    }

    #[test]
    fn test_generated_email_shape() {
        for _ in 0..200 {
            let identity = Identity::generate().unwrap();
            assert_generated_shape(identity.email.as_str());
        }
    }

    #[test]
    fn test_generated_password() {
        let identity = Identity::generate().unwrap();
        assert_eq!(identity.password.expose_secret(), "Test1234");
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = Identity::generate_with(&mut StdRng::seed_from_u64(7)).unwrap();
        let b = Identity::generate_with(&mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a.email, b.email);
    }

    #[test]
    fn test_generated_emails_differ() {
        let emails: HashSet<_> = (0..50)
            .map(|_| Identity::generate().unwrap().email)
            .collect();
        assert_eq!(emails.len(), 50);
    }

    #[test]
    fn test_nickname_is_local_part() {
        let identity = Identity::new(Email::parse("user_abc123@demo.com").unwrap(), "Test1234");
        assert_eq!(identity.nickname(), "user_abc123");
    }

    #[test]
    fn test_debug_redacts_password() {
        let identity = Identity::new(Email::parse("user_abc123@demo.com").unwrap(), "Test1234");
        let debug = format!("{identity:?}");
        assert!(debug.contains("user_abc123@demo.com"));
        assert!(!debug.contains("Test1234"));
    }
}
