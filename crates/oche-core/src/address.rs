// Venue address normalization.

/// Normalize a venue address for comparison: surrounding whitespace is
/// trimmed and the result is lowercased, so `"A"`, `"a "` and `" A"` are
/// all the same venue.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Whether two addresses refer to the same venue.
pub fn same_address(a: &str, b: &str) -> bool {
    normalize_address(a) == normalize_address(b)
}
