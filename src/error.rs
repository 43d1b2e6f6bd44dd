use std::fmt;
use std::io;

pub(crate) type StyleResult<T> = Result<T, Error>;

/// Errors that can occur during rulestyle usage
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred when reading a language definition file
    Io(io::Error),

    /// JSON parsing failed when loading a language definition.
    Json(serde_json::Error),

    /// A rule pattern, or the combined pattern built from all the rules, failed to compile.
    /// `group` is the group name of the offending rule when it can be pinned down.
    #[allow(missing_docs)]
    InvalidPattern {
        language: String,
        group: Option<String>,
        message: String,
    },

    /// Two rules of the same language, or a rule pattern and another rule, use the
    /// same group name. The owning rule of a match could not be identified reliably.
    #[allow(missing_docs)]
    DuplicateGroupName { language: String, group: String },

    /// A group name that the regex engine would not accept as a named group.
    #[allow(missing_docs)]
    InvalidGroupName { language: String, group: String },

    /// A rule without a style name.
    /// `index` is the position of the rule in its language.
    #[allow(missing_docs)]
    EmptyStyleName { language: String, index: usize },

    /// A language was not found in the registry.
    /// Only happens when asking to style something with a language we can't find
    LanguageNotFound(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Json(err) => write!(f, "JSON parsing error: {}", err),
            Error::InvalidPattern {
                language,
                group: Some(group),
                message,
            } => write!(
                f,
                "invalid pattern for rule '{}' in language '{}': {}",
                group, language, message
            ),
            Error::InvalidPattern {
                language,
                group: None,
                message,
            } => write!(
                f,
                "invalid pattern in language '{}': {}",
                language, message
            ),
            Error::DuplicateGroupName { language, group } => write!(
                f,
                "duplicate group name '{}' in language '{}'",
                group, language
            ),
            Error::InvalidGroupName { language, group } => write!(
                f,
                "invalid group name '{}' in language '{}'",
                group, language
            ),
            Error::EmptyStyleName { language, index } => write!(
                f,
                "rule #{} in language '{}' has no style name",
                index, language
            ),
            Error::LanguageNotFound(name) => write!(f, "language '{}' not found", name),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::InvalidPattern { .. }
            | Error::DuplicateGroupName { .. }
            | Error::InvalidGroupName { .. }
            | Error::EmptyStyleName { .. }
            | Error::LanguageNotFound(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
