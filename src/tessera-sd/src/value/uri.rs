use std::{fmt, str::FromStr};

use url::Url;

/// A URI reference.
///
/// Text that parses as an absolute URL is kept in normalized form.
/// Anything else, including relative references, is kept verbatim, so
/// parsing never fails.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Uri {
    /// An absolute URL.
    Absolute(Url),
    /// A relative reference or otherwise unparseable text.
    Relative(String),
}

impl Default for Uri {
    fn default() -> Self {
        Self::Relative(String::new())
    }
}

impl Uri {
    /// Interprets `text` as a URI reference.
    pub fn parse(text: &str) -> Self {
        match Url::parse(text) {
            Ok(url) => Self::Absolute(url),
            Err(_) => Self::Relative(text.to_owned()),
        }
    }

    /// Gets the textual form.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Absolute(url) => url.as_str(),
            Self::Relative(text) => text,
        }
    }

    /// Whether the text parsed as an absolute URL.
    #[inline]
    pub fn is_absolute(&self) -> bool {
        matches!(self, Self::Absolute(..))
    }

    /// Whether the textual form is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl FromStr for Uri {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<Url> for Uri {
    fn from(url: Url) -> Self {
        Self::Absolute(url)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
