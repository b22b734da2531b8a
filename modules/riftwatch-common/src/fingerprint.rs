use sha2::{Digest, Sha256};

/// Deterministic content fingerprint used by the Ingestor to deduplicate
/// articles across sources. Empty content fingerprints to the empty string,
/// matching the convention that an absent body is never a dedup key.
pub fn fingerprint(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_fingerprints_empty() {
        assert_eq!(fingerprint(""), "");
    }

    #[test]
    fn identical_content_same_fingerprint() {
        assert_eq!(fingerprint("clash in ikeja"), fingerprint("clash in ikeja"));
    }

    #[test]
    fn different_content_different_fingerprint() {
        assert_ne!(fingerprint("clash in ikeja"), fingerprint("clash in lagos"));
    }

    #[test]
    fn is_hex_sha256() {
        let fp = fingerprint("hello world");
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
