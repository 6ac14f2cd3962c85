//! Interactive password prompts.
//!
//! Passwords are collected without echo and held behind `secrecy` so
//! they never land in logs or debug output.

use anyhow::{Context, Result};
use inquire::{min_length, Password, PasswordDisplayMode};
use secrecy::SecretString;

use crate::config::PASSWORD_MIN_LEN;

/// Prompts for a new password, entered twice to catch typos.
///
/// A typo here would make the container permanently unreadable, hence
/// the mandatory confirmation.
pub fn encryption_password() -> Result<SecretString> {
    let password = Password::new("Encryption password:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_validator(min_length!(PASSWORD_MIN_LEN, "password is too short"))
        .with_custom_confirmation_message("Confirm password:")
        .with_custom_confirmation_error_message("passwords do not match")
        .prompt()
        .context("password entry aborted")?;

    Ok(SecretString::from(password))
}

/// Prompts for the password of an existing container, single entry.
pub fn decryption_password() -> Result<SecretString> {
    let password = Password::new("Password:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("password entry aborted")?;

    Ok(SecretString::from(password))
}
