//! Request input checks.
//!
//! Lengths are counted in characters, not bytes, except for the email upper
//! bound which follows the 254-byte address limit.

use crate::error::Error;

pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MAX_PASSWORD_CHARS: usize = 128;
pub const MAX_EMAIL_BYTES: usize = 254;
pub const MAX_TITLE_CHARS: usize = 200;

/// Check that `email` looks like `local@domain`.
///
/// This is a shape check only; nothing is sent to the address.
pub fn validate_email(email: &str) -> Result<(), Error> {
    let invalid = || Error::Validation("email must be a valid email address".to_string());

    if email.len() > MAX_EMAIL_BYTES || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid());
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    if domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), Error> {
    let length = password.chars().count();
    if !(MIN_PASSWORD_CHARS..=MAX_PASSWORD_CHARS).contains(&length) {
        return Err(Error::Validation(format!(
            "password must be between {MIN_PASSWORD_CHARS} and {MAX_PASSWORD_CHARS} characters"
        )));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), Error> {
    let length = title.chars().count();
    if length == 0 || length > MAX_TITLE_CHARS {
        return Err(Error::Validation(format!(
            "title must be between 1 and {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(())
}

pub fn validate_content(content: &str) -> Result<(), Error> {
    if content.is_empty() {
        return Err(Error::Validation("content must not be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        for email in ["a@x.com", "first.last+tag@sub.example.org", "A@X.COM", "u@localhost"] {
            assert_eq!(validate_email(email), Ok(()), "{email} should be valid");
        }
    }

    #[test]
    fn test_invalid_emails() {
        let too_long = format!("{}@x.com", "a".repeat(250));
        for email in [
            "",
            "no-at-sign",
            "@x.com",
            "a@",
            "a@b@c.com",
            "a @x.com",
            "a@x.com ",
            "a@.com",
            "a@x.",
            too_long.as_str(),
        ] {
            assert!(
                matches!(validate_email(email), Err(Error::Validation(_))),
                "{email:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_password_length_bounds() {
        assert!(validate_password("1234567").is_err());
        assert_eq!(validate_password("12345678"), Ok(()));
        assert_eq!(validate_password(&"p".repeat(128)), Ok(()));
        assert!(validate_password(&"p".repeat(129)).is_err());
        // Eight characters, more than eight bytes.
        assert_eq!(validate_password("éééééééé"), Ok(()));
    }

    #[test]
    fn test_title_bounds() {
        assert!(validate_title("").is_err());
        assert_eq!(validate_title("T"), Ok(()));
        assert_eq!(validate_title(&"t".repeat(200)), Ok(()));
        assert!(validate_title(&"t".repeat(201)).is_err());
    }

    #[test]
    fn test_content_non_empty() {
        assert!(validate_content("").is_err());
        assert_eq!(validate_content(" "), Ok(()));
    }
}
