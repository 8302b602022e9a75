use regex::Regex;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("URL is empty")]
    Empty,
    #[error("URL must start with http:// or https://")]
    BadScheme,
    #[error("URL has no host or contains whitespace")]
    BadHost,
    #[error("username is empty")]
    EmptyUsername,
    #[error("refresh interval must be at least one second")]
    ZeroInterval,
}

lazy_static::lazy_static! {
    /// scheme://host[:port][/path], no whitespace anywhere
    static ref BASE_URL_RE: Regex = Regex::new(r"^https?://[^\s/?#]+(/\S*)?$").unwrap();
}

/// Trim surrounding whitespace and any trailing '/'.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

pub fn validate_base_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::Empty);
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ValidationError::BadScheme);
    }
    if !BASE_URL_RE.is_match(url) {
        return Err(ValidationError::BadHost);
    }
    Ok(())
}

pub fn validate_username(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    Ok(())
}

pub fn validate_interval_secs(secs: u64) -> Result<(), ValidationError> {
    if secs == 0 {
        return Err(ValidationError::ZeroInterval);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_typical_appliance_urls() {
        assert!(validate_base_url("http://192.168.1.2:3000").is_ok());
        assert!(validate_base_url("https://adguard.lan/sub").is_ok());
    }

    #[test]
    fn rejects_bad_urls() {
        assert!(matches!(validate_base_url(""), Err(ValidationError::Empty)));
        assert!(matches!(
            validate_base_url("ftp://host"),
            Err(ValidationError::BadScheme)
        ));
        assert!(matches!(
            validate_base_url("http://"),
            Err(ValidationError::BadHost)
        ));
        assert!(matches!(
            validate_base_url("http://a b"),
            Err(ValidationError::BadHost)
        ));
    }

    #[test]
    fn normalizes_trailing_slash() {
        assert_eq!(normalize_base_url(" http://a:3000/ "), "http://a:3000");
    }

    #[test]
    fn username_and_interval() {
        assert!(validate_username("  ").is_err());
        assert!(validate_username("admin").is_ok());
        assert!(validate_interval_secs(0).is_err());
        assert!(validate_interval_secs(60).is_ok());
    }
}
