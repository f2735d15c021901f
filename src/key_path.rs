//! Dot-path helpers shared by flattening and re-nesting.

/// Separator between the segments of a flat key.
pub const SEPARATOR: char = '.';

/// Joins `segment` onto `prefix`, inserting the separator when the prefix is non-empty.
pub fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        let mut key = String::with_capacity(prefix.len() + 1 + segment.len());
        key.push_str(prefix);
        key.push(SEPARATOR);
        key.push_str(segment);
        key
    }
}

/// Joins all `segments` with the separator.
pub fn join_all<S: AsRef<str>>(segments: &[S]) -> String {
    let mut key = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            key.push(SEPARATOR);
        }
        key.push_str(segment.as_ref());
    }
    key
}

/// Splits a flat key into its segments.
pub fn split(key: &str) -> impl Iterator<Item = &str> {
    key.split(SEPARATOR)
}
