//! Account field checks.
//!
//! Each helper returns the user-facing message of the first rule that fails.

use validator::ValidateEmail;

use crate::error::{UserError, UserResult};

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 8;

fn invalid(message: &str) -> UserError {
    UserError::Validation(message.to_string())
}

pub fn validate_username(username: &str) -> UserResult<()> {
    let username = username.trim();
    if username.is_empty() {
        return Err(invalid("Username is required."));
    }
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(invalid("Username must be at least 3 characters long."));
    }
    Ok(())
}

/// HTML5 email shape, and the domain must contain a dot.
pub fn validate_email(email: &str) -> UserResult<()> {
    let email = email.trim();
    let has_dotted_domain = email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.') && !domain.ends_with('.'));

    if !email.validate_email() || !has_dotted_domain {
        return Err(invalid("Invalid email format."));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> UserResult<()> {
    if password.is_empty() {
        return Err(invalid("Password is required."));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(invalid("Password must be at least 8 characters long."));
    }
    Ok(())
}

pub fn validate_password_match(password: &str, confirm: &str) -> UserResult<()> {
    if password != confirm {
        return Err(invalid("Passwords do not match."));
    }
    Ok(())
}
