//! Utility functions

use uuid::Uuid;

/// Parses a tenant identifier, rejecting the nil UUID.
pub fn parse_tenant_id(s: &str) -> Option<Uuid> {
    Uuid::parse_str(s.trim()).ok().filter(|id| !id.is_nil())
}

pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let keep = if local.chars().count() <= 2 { 1 } else { 2 };
        let prefix: String = local.chars().take(keep).collect();
        format!("{}***{}", prefix, domain)
    } else {
        "***".to_string()
    }
}

/// Renders a secret for logs: first four characters only.
pub fn mask_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    format!("{}***", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tenant_id_rejects_nil_and_garbage() {
        assert!(parse_tenant_id("not-a-uuid").is_none());
        assert!(parse_tenant_id("00000000-0000-0000-0000-000000000000").is_none());
        let id = Uuid::new_v4();
        assert_eq!(parse_tenant_id(&format!(" {} ", id)), Some(id));
    }

    #[test]
    fn masks() {
        assert_eq!(mask_email("alice@x.com"), "al***@x.com");
        assert_eq!(mask_email("a@x.com"), "a***@x.com");
        assert_eq!(mask_secret("abcdefgh"), "abcd***");
        assert_eq!(mask_secret("ab"), "ab***");
    }

    #[test]
    fn mask_email_keeps_whole_characters() {
        assert_eq!(mask_email("aé@x.com"), "a***@x.com");
        assert_eq!(mask_email("éèêx@x.com"), "éè***@x.com");
        assert_eq!(mask_email("@x.com"), "***@x.com");
        assert_eq!(mask_email("nobody"), "***");
    }
}
