use secrecy::{ExposeSecret, Secret};

/// Counted without spaces.
pub const MIN_PASSWORD_LENGTH: usize = 12;

pub const MAX_PASSWORD_LENGTH: usize = 128;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum PasswordValidationError {
    #[error("Das Passwort muss mindestens 12 Zeichen (ohne Leerzeichen) enthalten.")]
    TooShort,
    #[error("Das Passwort darf höchstens 128 Zeichen lang sein.")]
    TooLong,
}

pub fn validate_password_length(password: &Secret<String>) -> Result<(), PasswordValidationError> {
    let password = password.expose_secret();
    if password.chars().filter(|c| *c != ' ').count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordValidationError::TooShort);
    }
    if password.chars().count() > MAX_PASSWORD_LENGTH {
        return Err(PasswordValidationError::TooLong);
    }
    Ok(())
}
