/// Validate an email: must contain '@' and '.', max 254 chars.
pub fn validate_email(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Some("E-mail é obrigatório".to_string());
    }
    if trimmed.len() > 254 {
        return Some("E-mail deve ter no máximo 254 caracteres".to_string());
    }
    if !trimmed.contains('@') || !trimmed.contains('.') {
        return Some("Informe um e-mail válido".to_string());
    }
    None
}

/// Validate a sign-up password: the auth server rejects anything under 6 chars.
pub fn validate_password(password: &str) -> Option<String> {
    if password.is_empty() {
        return Some("Senha é obrigatória".to_string());
    }
    if password.chars().count() < 6 {
        return Some("A senha deve ter pelo menos 6 caracteres".to_string());
    }
    None
}

/// Validate a required text field with a max length.
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} é obrigatório"));
    }
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} deve ter no máximo {max_len} caracteres"));
    }
    None
}

/// Validate an optional text field with a max length (empty is OK).
pub fn validate_optional(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.chars().count() > max_len {
        return Some(format!("{field_name} deve ter no máximo {max_len} caracteres"));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank_and_long() {
        assert!(validate_required("  ", "Nome", 10).is_some());
        assert!(validate_required("abcdefghijk", "Nome", 10).is_some());
        assert_eq!(validate_required(" ok ", "Nome", 10), None);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert_eq!(validate_required("çãõéí", "Nome", 5), None);
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("sem-arroba").is_some());
        assert_eq!(validate_email("ana@empresa.com"), None);
    }

    #[test]
    fn short_password() {
        assert!(validate_password("12345").is_some());
        assert_eq!(validate_password("123456"), None);
    }
}
