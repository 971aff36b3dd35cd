use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Characters that may not appear in a stored upload name.
    /// Anything outside ASCII letters, digits, `_`, `.` and `-` is dropped.
    pub static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_.-]").unwrap();
}

/// Derive a filesystem-safe name from a client-supplied filename.
///
/// Path separators become spaces, whitespace runs become a single `_`,
/// non-ASCII and other unsafe characters are dropped, and leading or
/// trailing `.`/`_` are stripped. The result may be empty.
/// - `"My cool movie.mov"` -> `"My_cool_movie.mov"`
/// - `"../../../etc/passwd"` -> `"etc_passwd"`
pub fn secure_filename(name: &str) -> String {
    let ascii: String = name
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    UNSAFE_FILENAME_CHARS
        .replace_all(&joined, "")
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// True when `name` is non-empty and already in `secure_filename` form
pub fn is_secure_filename(name: &str) -> bool {
    !name.is_empty() && secure_filename(name) == name
}
