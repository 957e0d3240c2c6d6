// file: src/utils/validation.rs
// description: input validation helpers shared by services and the command line
// reference: input validation patterns

use crate::error::{PortalError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+$")
        .expect("EMAIL regex is valid");
}

pub struct Validator;

impl Validator {
    pub fn validate_url(url: &str) -> Result<()> {
        let parsed = Url::parse(url)
            .map_err(|e| PortalError::Validation(format!("Invalid URL format: {}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(PortalError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn validate_not_blank(field: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(PortalError::Validation(format!("{} is required", field)));
        }
        Ok(())
    }

    /// Loose shape check; the backend owns uniqueness and the real rules.
    pub fn validate_email(email: &str) -> Result<()> {
        let email = email.trim();
        if !EMAIL.is_match(email) {
            return Err(PortalError::Validation(format!(
                "Invalid email address: {}",
                email
            )));
        }
        Ok(())
    }

    pub fn validate_year(year: u8) -> Result<()> {
        if !(1..=6).contains(&year) {
            return Err(PortalError::Validation(format!(
                "Year must be between 1 and 6, got {}",
                year
            )));
        }
        Ok(())
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            text.to_string()
        } else {
            let cut: String = text.chars().take(max_chars).collect();
            format!("{}...", cut)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(Validator::validate_url("https://example.supabase.co").is_ok());
        assert!(Validator::validate_url("http://localhost:54321").is_ok());
        assert!(Validator::validate_url("example.com").is_err());
        assert!(Validator::validate_url("ftp://example.com").is_err());
        assert!(Validator::validate_url("https://").is_err());
        assert!(Validator::validate_url("http://exa mple.com").is_err());
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(Validator::validate_not_blank("Name", "Ada").is_ok());
        let err = Validator::validate_not_blank("Name", "   ").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Name is required");
    }

    #[test]
    fn test_validate_email() {
        assert!(Validator::validate_email("ada@uni.edu").is_ok());
        assert!(Validator::validate_email("ada@uni").is_err());
        assert!(Validator::validate_email("@uni.edu").is_err());
        assert!(Validator::validate_email("ada.uni.edu").is_err());
    }

    #[test]
    fn test_validate_year() {
        assert!(Validator::validate_year(1).is_ok());
        assert!(Validator::validate_year(4).is_ok());
        assert!(Validator::validate_year(0).is_err());
        assert!(Validator::validate_year(7).is_err());
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(
            Validator::truncate_text("this is a very long text", 10),
            "this is a ..."
        );
        assert_eq!(Validator::truncate_text("héllo wörld", 5), "héllo...");
    }
}
