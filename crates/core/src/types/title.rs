//! Product title type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductTitle`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TitleError {
    /// The title is empty or only whitespace.
    #[error("title is required")]
    Blank,
    /// The title is longer than allowed.
    #[error("titles cannot be more than {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// The user-facing title of a product: required, at most 50 characters.
///
/// The title is kept exactly as entered; catalog search matches against it
/// case-sensitively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ProductTitle(String);

impl ProductTitle {
    /// Maximum title length in characters.
    pub const MAX_LENGTH: usize = 50;

    /// Parse a `ProductTitle`.
    ///
    /// # Errors
    ///
    /// Returns [`TitleError::Blank`] for empty/whitespace input and
    /// [`TitleError::TooLong`] past [`Self::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, TitleError> {
        if s.trim().is_empty() {
            return Err(TitleError::Blank);
        }
        if s.chars().count() > Self::MAX_LENGTH {
            return Err(TitleError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the title as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ProductTitle {
    type Error = TitleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProductTitle> for String {
    fn from(title: ProductTitle) -> Self {
        title.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 50 multi-byte characters is still within the limit
        assert!(ProductTitle::parse(&"é".repeat(50)).is_ok());
        assert_eq!(
            ProductTitle::parse(&"x".repeat(51)),
            Err(TitleError::TooLong { max: 50 })
        );
    }

    #[test]
    fn test_blank_titles_rejected() {
        assert_eq!(ProductTitle::parse(""), Err(TitleError::Blank));
        assert_eq!(ProductTitle::parse("   "), Err(TitleError::Blank));
    }

    #[test]
    fn test_title_kept_verbatim() {
        let title = ProductTitle::parse("  Widget ").unwrap();
        assert_eq!(title.as_str(), "  Widget ");
    }
}
