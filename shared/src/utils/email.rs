//! Email address helpers

/// Mask an email address for logging.
///
/// Keeps the first character of the local part and the whole domain:
/// `user@example.com` becomes `u***@example.com`. Input without an `@`
/// is fully masked.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        }
        _ => "***".to_string(),
    }
}
