//! Splits dot-delimited paths into segments.

/// Splits `path` into a navigation prefix and a final segment.
///
/// Each piece between dots is trimmed and empty pieces are dropped. If nothing
/// is left, the result is an empty prefix and an empty final segment. This
/// never fails.
///
/// # Example
///
/// ```
/// use plistquill::keypath::tokenize;
///
/// let (prefix, last) = tokenize("Misc.Security.AllowSetDefault");
/// assert_eq!(prefix, vec!["Misc", "Security"]);
/// assert_eq!(last, "AllowSetDefault");
///
/// let (prefix, last) = tokenize("....");
/// assert!(prefix.is_empty());
/// assert_eq!(last, "");
/// ```
pub fn tokenize(path: &str) -> (Vec<String>, String) {
    let mut segments: Vec<String> = path
        .split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();

    match segments.pop() {
        Some(last) => (segments, last),
        None => (Vec::new(), String::new()),
    }
}
