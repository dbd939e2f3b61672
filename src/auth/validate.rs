use url::Url;

/// Validate an email: must contain '@' and '.', max 254 chars.
pub fn validate_email(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Some("Email is required".to_string());
    }
    if trimmed.len() > 254 {
        return Some("Email must be at most 254 characters".to_string());
    }
    let valid_shape = trimmed
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'));
    if !valid_shape || trimmed.contains(char::is_whitespace) {
        return Some("Email must be a valid address".to_string());
    }
    None
}

/// Validate a required text field with a minimum length (after trimming).
pub fn validate_min_len(value: &str, field_name: &str, min_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.chars().count() < min_len {
        return Some(format!("{field_name} must be at least {min_len} characters"));
    }
    None
}

/// Validate an attachment link: absolute http(s) URL.
pub fn validate_url(value: &str, field_name: &str) -> Option<String> {
    match Url::parse(value.trim()) {
        Ok(url) => match url.scheme() {
            "http" | "https" => None,
            scheme => Some(format!("{field_name} has unsupported URL scheme: {scheme}")),
        },
        Err(e) => Some(format!("{field_name} is not a valid URL: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert_eq!(validate_email("ava.dawson@testers.io"), None);
        assert!(validate_email("").is_some());
        assert!(validate_email("ava").is_some());
        assert!(validate_email("@testers.io").is_some());
        assert!(validate_email("ava@localhost").is_some());
        assert!(validate_email("ava @testers.io").is_some());
    }

    #[test]
    fn min_len_counts_trimmed_chars() {
        assert_eq!(validate_min_len("abc", "Title", 3), None);
        assert_eq!(
            validate_min_len("  ab  ", "Title", 3).as_deref(),
            Some("Title must be at least 3 characters")
        );
        assert_eq!(validate_min_len("   ", "Title", 3).as_deref(), Some("Title is required"));
    }

    #[test]
    fn attachment_urls() {
        assert_eq!(validate_url("https://cdn.example.com/shot.png", "Attachment"), None);
        assert!(validate_url("ftp://example.com/a", "Attachment").is_some());
        assert!(validate_url("not a url", "Attachment").is_some());
    }
}
