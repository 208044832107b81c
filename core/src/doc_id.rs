use std::cmp::Ordering;

/// Canonical string form of a document identifier.
///
/// Integer-looking input (`"7"`, `"007"`, `"+7"`, `" 7 "`) collapses to its
/// decimal rendering, with no upper bound on magnitude. Anything else is
/// returned unchanged.
pub fn canonical_doc_id(raw: &str) -> String {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return raw.to_string();
    }
    let digits = digits.trim_start_matches('0');
    match (digits.is_empty(), negative) {
        (true, _) => "0".to_string(),
        (false, true) => format!("-{digits}"),
        (false, false) => digits.to_string(),
    }
}

/// Total order on canonical doc ids: integers numerically, then everything
/// else lexically.
pub fn cmp_doc_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
