use std::fmt;

/// Opaque identifier for one snapshot of the remote artifact (a commit SHA
/// for GitHub sources).
///
/// Tags carry no structure; two tags are the same snapshot only if their
/// trimmed text is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionTag(String);

impl VersionTag {
    /// Build a tag, trimming surrounding whitespace. Returns `None` for
    /// blank input so an empty record never masquerades as a version.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let tag = VersionTag::new("  abc123\n").unwrap();
        assert_eq!(tag.as_str(), "abc123");
        assert_eq!(tag, VersionTag::new("abc123").unwrap());
    }

    #[test]
    fn blank_input_is_not_a_tag() {
        assert!(VersionTag::new("").is_none());
        assert!(VersionTag::new(" \n\t").is_none());
    }

    #[test]
    fn display_is_the_raw_text() {
        let tag = VersionTag::new("deadbeef").unwrap();
        assert_eq!(tag.to_string(), "deadbeef");
    }
}
