/// Round to the nearest integer, halves away from zero.
///
/// Money and percentages all go through this so `6.5` is always `7`
/// regardless of platform or float formatting defaults.
pub fn round_half_up(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    value.round() as i64
}

/// `part / whole * 100`, rounded half-up. Zero when `whole` is zero.
///
/// Integer arithmetic keeps exact halves exact: 23 of 40 is 57.5%, which
/// rounds to 58.
pub fn percent_of(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = part as u64;
    let whole = whole as u64;
    let rounded = (part.saturating_mul(200).saturating_add(whole)) / (2 * whole);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Case-insensitive substring test. `needle` must already be lowercase.
pub fn contains_lowercase(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// True for the values a filter control uses to mean "no constraint".
///
/// Example: "", "  ", "all", "All" → true
pub fn is_unconstrained(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all")
}

/// Compare an agent reference against an id or display name.
///
/// Example: ("set-1", "Giulia Rossi") matches "giulia rossi" and "set-1"
pub fn agent_matches(reference: &str, id: &str, name: &str) -> bool {
    let reference = reference.trim();
    !reference.is_empty() && (reference == id || reference.eq_ignore_ascii_case(name))
}
