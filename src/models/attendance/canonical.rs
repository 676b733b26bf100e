//! String canonicalization for attendance matching.
//!
//! Presence lists often carry email addresses while the attendee roster
//! carries display names; the canonical key plus the email-local-part
//! heuristic bridges the two representations deterministically. This is an
//! approximation, not an identity match: two people whose names reduce to
//! the same key collide.

/// Canonical key: trimmed, lowercased, alphanumerics only.
/// "Jane Doe" and "jane.doe" both reduce to "janedoe".
pub fn canonical_key(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// The part of an address before '@'. A string without '@' (or starting
/// with it) is returned whole.
pub fn email_local_part(s: &str) -> &str {
    match s.find('@') {
        Some(pos) if pos > 0 => &s[..pos],
        _ => s,
    }
}

/// Normalize a freeform date key to `YYYY-MM-DD`.
///
/// Digit runs are taken as `[year, month, day]`; extra runs are ignored.
/// Keys with implausible components or impossible calendar dates yield
/// `None` and are dropped by the caller.
pub fn normalize_date_key(raw: &str) -> Option<String> {
    let parts: Vec<u32> = raw
        .split(|c: char| !c.is_ascii_digit())
        .filter(|p| !p.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;

    if let [y, m, d, ..] = parts[..] {
        if y > 1900 && (1..=12).contains(&m) && (1..=31).contains(&d) {
            chrono::NaiveDate::from_ymd_opt(y as i32, m, d)?;
            return Some(format!("{y:04}-{m:02}-{d:02}"));
        }
    }
    None
}

/// Case-insensitive sort for roster and per-date name lists, with the
/// original form as tie-breaker so output order is total.
pub fn sort_names(names: &mut [String]) {
    names.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
}
