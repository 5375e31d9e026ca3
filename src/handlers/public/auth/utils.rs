/// Minimum password length enforced at signup.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Permissive email shape check: no whitespace, exactly one `@`, and a dot
/// inside the domain with characters on both sides. Anything stricter
/// belongs to a confirmation-mail flow, not to the API surface.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let (local, domain) = (parts[0], parts[1]);
    if local.is_empty() {
        return false;
    }

    domain
        .find('.')
        .map_or(false, |i| i > 0 && i + 1 < domain.len())
}

/// A field counts as provided when it is non-empty, mirroring clients that
/// submit empty strings for untouched inputs.
pub fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
