use serde::Deserialize;

/// Highest score [`password_strength`] can return.
pub const MAX_PASSWORD_STRENGTH: u8 = 5;

/// Stronger password requirement applied to corporate accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub min_strength: u8,
}

impl PasswordPolicy {
    pub fn is_weak(&self, password: &str) -> bool {
        password_strength(password, self.min_length) < self.min_strength
    }
}

/// Scores a password from 0 to [`MAX_PASSWORD_STRENGTH`], one point each for
/// reaching `min_length` characters, containing a lowercase letter, an
/// uppercase letter, a digit, and a non-alphanumeric character.
pub fn password_strength(password: &str, min_length: usize) -> u8 {
    let checks = [
        password.chars().count() >= min_length,
        password.chars().any(|c| c.is_lowercase()),
        password.chars().any(|c| c.is_uppercase()),
        password.chars().any(|c| c.is_numeric()),
        password.chars().any(|c| !c.is_alphanumeric()),
    ];

    checks.iter().filter(|passed| **passed).count() as u8
}
