//! Utility functions

pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        match local.chars().count() {
            0 => format!("***{}", domain),
            1 | 2 => format!("{}***{}", &local[..local.chars().next().map_or(0, char::len_utf8)], domain),
            _ => {
                let cut = local.char_indices().nth(2).map_or(local.len(), |(i, _)| i);
                format!("{}***{}", &local[..cut], domain)
            }
        }
    } else {
        "***".to_string()
    }
}

/// Reduces a client-supplied file name to `[A-Za-z0-9._-]`, keeping the
/// extension and capping the length. Never returns an empty string.
pub fn sanitize_file_name(name: &str, max_len: usize) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');

    let mut out = if trimmed.is_empty() { "upload".to_string() } else { trimmed.to_string() };
    if out.len() > max_len {
        let keep_ext = out
            .rfind('.')
            .map(|i| out[i..].to_string())
            .filter(|ext| ext.len() < max_len);
        match keep_ext {
            Some(ext) => {
                out.truncate(max_len - ext.len());
                out.push_str(&ext);
            }
            None => out.truncate(max_len),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@example.com"), "al***@example.com");
        assert_eq!(mask_email("b@example.com"), "b***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }

    #[test]
    fn test_sanitize_strips_paths_and_unsafe_chars() {
        assert_eq!(sanitize_file_name("../../etc/passwd", 100), "passwd");
        assert_eq!(sanitize_file_name("C:\\img\\my sword!.png", 100), "my_sword_.png");
        assert_eq!(sanitize_file_name("...", 100), "upload");
    }

    #[test]
    fn test_sanitize_keeps_extension_when_truncating() {
        let long = format!("{}.png", "a".repeat(200));
        let out = sanitize_file_name(&long, 20);
        assert_eq!(out.len(), 20);
        assert!(out.ends_with(".png"));
    }
}
