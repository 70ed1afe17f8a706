use std::path::PathBuf;

/// Value of `name` with surrounding whitespace removed, or `None` when the
/// variable is unset or blank.
pub fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub fn path_var(name: &str) -> Option<PathBuf> {
    non_empty_var(name).map(PathBuf::from)
}

/// Parse a millisecond count, accepting `_` separators (`3_000`).
pub fn parse_millis(raw: &str) -> Option<u64> {
    let digits: String = raw.trim().chars().filter(|c| *c != '_').collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

pub fn parse_millis_var(name: &str) -> Option<u64> {
    non_empty_var(name).and_then(|raw| parse_millis(&raw))
}
