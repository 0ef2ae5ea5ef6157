use validator::ValidateEmail;

/// Validates that the input looks like a valid email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.validate_email()
}

/// Validates a person or record name: non-blank, at most `max` characters.
pub fn is_valid_name(name: &str, max: usize) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= max
}

/// Validates an optional phone number: digits with an optional leading
/// `+`, spaces and dashes allowed, 6-20 significant characters.
pub fn is_valid_phone(phone: &str) -> bool {
    let cleaned: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    (6..=20).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("test@example.com"));
        assert!(is_valid_email("user.name@domain.co.uk"));
        assert!(is_valid_email("user+tag@example.org"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("   "));
        assert!(!is_valid_email("notanemail"));
        assert!(!is_valid_email("@nodomain.com"));
        assert!(!is_valid_email("spaces in@email.com"));
    }

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("Asha Rahman", 100));
        assert!(is_valid_name("  padded  ", 100));
        assert!(is_valid_name(&"x".repeat(100), 100));
    }

    #[test]
    fn test_invalid_names() {
        assert!(!is_valid_name("", 100));
        assert!(!is_valid_name("   ", 100));
        assert!(!is_valid_name(&"x".repeat(101), 100));
    }

    #[test]
    fn test_valid_phones() {
        assert!(is_valid_phone("+8801712345678"));
        assert!(is_valid_phone("01712 345 678"));
        assert!(is_valid_phone("555-0199"));
    }

    #[test]
    fn test_invalid_phones() {
        assert!(!is_valid_phone(""));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("phone"));
        assert!(!is_valid_phone("+"));
        assert!(!is_valid_phone(&"9".repeat(21)));
    }
}
