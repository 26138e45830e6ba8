//! Input validation utilities

use regex::Regex;
use rust_decimal::Decimal;
use std::sync::OnceLock;

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 5;

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate a recipe title
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title is required".to_string());
    }

    if title.len() > 255 {
        return Err("Title must be at most 255 characters long".to_string());
    }

    Ok(())
}

/// Validate a tag or ingredient name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    if name.len() > 255 {
        return Err("Name must be at most 255 characters long".to_string());
    }

    Ok(())
}

/// Validate recipe preparation time
pub fn validate_time_minutes(time_minutes: i32) -> Result<(), String> {
    if time_minutes < 0 {
        return Err("Time must not be negative".to_string());
    }

    Ok(())
}

/// Validate recipe price
pub fn validate_price(price: Decimal) -> Result<(), String> {
    if price.is_sign_negative() {
        return Err("Price must not be negative".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_accepts_valid() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name+tag@sub.example.org").is_ok());
    }

    #[test]
    fn test_validate_email_rejects_invalid() {
        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("missing@tld").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn test_validate_password_minimum_length() {
        assert!(validate_password("psw").is_err());
        assert!(validate_password("pswd").is_err());
        assert!(validate_password("passw").is_ok());
        assert!(validate_password("password").is_ok());
    }

    #[test]
    fn test_validate_password_rejects_empty() {
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_validate_title() {
        assert!(validate_title("Sample recipe title").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
    }

    #[test]
    fn test_validate_time_minutes() {
        assert!(validate_time_minutes(0).is_ok());
        assert!(validate_time_minutes(22).is_ok());
        assert!(validate_time_minutes(-1).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Decimal::new(525, 2)).is_ok());
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price(Decimal::new(-1, 2)).is_err());
    }
}
