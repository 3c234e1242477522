//! Form rules for posting and signing in.
//!
//! Each rule returns the normalized value on success so callers send exactly
//! what was checked.

use thiserror::Error;

/// Minimum number of digits in a mobile number.
pub const MOBILE_MIN_DIGITS: usize = 10;

/// Length of a one-time password.
pub const OTP_LENGTH: usize = 6;

/// Shortest accepted display name, after trimming.
pub const NAME_MIN_CHARS: usize = 2;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a description for your post.")]
    DescriptionRequired,

    #[error("Please select an image for your post.")]
    ImageRequired,

    #[error("Please enter a valid mobile number (at least 10 digits)")]
    InvalidMobile,

    #[error("Please enter a valid 6-digit OTP")]
    InvalidOtp,

    #[error("Please enter a valid name")]
    InvalidName,
}

/// Check a new post's fields in order; the first failure wins.
///
/// Returns the trimmed description.
pub fn validate_post_form<'a, T>(
    description: &'a str,
    image: Option<&T>,
) -> Result<&'a str, ValidationError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(ValidationError::DescriptionRequired);
    }
    if image.is_none() {
        return Err(ValidationError::ImageRequired);
    }
    Ok(description)
}

/// Normalize a mobile number and require at least ten digits.
///
/// Characters other than digits, `+`, `-`, `(`, `)` and spaces are dropped.
pub fn validate_mobile(input: &str) -> Result<String, ValidationError> {
    let mobile: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' '))
        .collect();
    let digits = mobile.chars().filter(char::is_ascii_digit).count();

    if digits < MOBILE_MIN_DIGITS {
        return Err(ValidationError::InvalidMobile);
    }
    Ok(mobile.trim().to_string())
}

/// Require exactly six ASCII digits.
pub fn validate_otp(input: &str) -> Result<&str, ValidationError> {
    let otp = input.trim();
    if otp.len() != OTP_LENGTH || !otp.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidOtp);
    }
    Ok(otp)
}

pub fn validate_name(input: &str) -> Result<&str, ValidationError> {
    let name = input.trim();
    if name.chars().count() < NAME_MIN_CHARS {
        return Err(ValidationError::InvalidName);
    }
    Ok(name)
}
