//! Best-effort PII redaction for text that gets persisted.

use regex::Regex;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}(?-u:\b)").expect("valid email regex")
});

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)[0-9]{3}[-.]?[0-9]{3}[-.]?[0-9]{4}(?-u:\b)").expect("valid phone regex")
});

// Word boundaries are ASCII-only so matches glued to Thai or accented text
// are still found.

/// Replace email addresses with `[EMAIL]`, then US-style phone numbers with
/// `[PHONE]`. Not a guarantee of complete PII removal.
pub fn sanitize(text: &str) -> String {
    let redacted = EMAIL.replace_all(text, "[EMAIL]");
    PHONE.replace_all(&redacted, "[PHONE]").into_owned()
}
