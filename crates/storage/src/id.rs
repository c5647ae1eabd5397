//! Page id validation.
//!
//! Page ids come straight from the content source (item slugs) and end up as
//! URL path segments and exported file names, so they are checked before any
//! backend touches them.

use crate::error::{ErrorKind, Result};

/// Validates a page id.
///
/// An id is valid when it is non-empty, is not `.` or `..`, and contains no
/// path separators or control characters (NUL included). Ids are never
/// normalized: the id a page is stored under must be byte-for-byte the id it
/// is loaded with.
///
/// # Examples
///
/// ```
/// use folio_storage::validate_id;
/// assert!(validate_id("my-first-post").is_ok());
/// assert!(validate_id("404_page").is_ok());
/// assert!(validate_id("").is_err());
/// assert!(validate_id("../etc/passwd").is_err());
/// assert!(validate_id("a\0b").is_err());
/// ```
pub fn validate(id: &str) -> Result<&str> {
    let invalid = id.is_empty()
        || id == "."
        || id == ".."
        || id.chars().any(|c| c == '/' || c == '\\' || c.is_control());
    if invalid {
        exn::bail!(ErrorKind::InvalidId(id.to_string()));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("hello-world")]
    #[case("blog_page")]
    #[case("404_page")]
    #[case("ünïcödé")]
    #[case("with space")]
    #[case("dots.in.the.middle")]
    fn test_valid_ids(#[case] id: &str) {
        assert_eq!(validate(id).unwrap(), id);
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("..")]
    #[case("a/b")]
    #[case("a\\b")]
    #[case("nul\0byte")]
    #[case("new\nline")]
    fn test_invalid_ids(#[case] id: &str) {
        let err = validate(id).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidId(rejected) if rejected == id));
    }
}
