/*!
 * Whitespace cleanup for extracted text
 */

/// Collapse every run of two or more ASCII spaces into a single space
///
/// Equivalent to repeatedly replacing the first `"  "` at or after the last
/// repair point with `" "` until none is left. Tabs and newlines are kept,
/// so a space run is only merged with spaces that touch it directly.
pub fn collapse_spaces(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find("  ") {
        // Keep everything up to and including the first space of the run
        out.push_str(&rest[..=pos]);
        rest = rest[pos + 1..].trim_start_matches(' ');
    }
    out.push_str(rest);

    out
}
