/// Password Hashing and Verification
///
/// Passwords are opaque byte sequences; no strength policy is applied here.

use bcrypt::{hash, verify};

use crate::error::{AuthError, InfraError};

/// bcrypt work factor
pub const HASH_COST: u32 = 10;

/// Hash a password using bcrypt with a random salt
///
/// # Errors
/// Returns `InfraError::HashingFailure` only if bcrypt itself fails
pub fn hash_password(password: &str) -> Result<String, InfraError> {
    hash(password, HASH_COST).map_err(|e| InfraError::HashingFailure(e.to_string()))
}

/// Verify a password against a stored bcrypt hash
///
/// # Errors
/// - `AuthError::PasswordMismatch` if the password is wrong
/// - `AuthError::MalformedHash` if the stored hash cannot be parsed
pub fn verify_password(password: &str, hashed: &str) -> Result<(), AuthError> {
    match verify(password, hashed) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AuthError::PasswordMismatch),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be parsed");
            Err(AuthError::MalformedHash)
        }
    }
}
