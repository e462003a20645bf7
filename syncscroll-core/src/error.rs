//! Configuration errors.
//!
//! All of them are detected while building or attaching a region. Once a
//! region is running, scroll handling cannot fail.

use crate::config::Config;
use std::fmt;

/// Child reference a region needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// The space-holding placeholder child.
    Placeholder,
    /// The floating child.
    Floating,
}

impl Attribute {
    /// Key used for this attribute in configs.
    pub const fn key(&self) -> &'static str {
        match *self {
            Attribute::Placeholder => "placeholder",
            Attribute::Floating => "floating",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error while setting up a sync region.
#[derive(Debug)]
pub enum Error {
    /// The placeholder or floating reference is missing, or does not match
    /// any child of the region.
    MissingRequiredChildReference {
        /// Name of the offending region.
        region: String,
        /// Which reference could not be resolved.
        attribute: Attribute,
    },

    /// No scroll source was found among the ancestors of a region.
    NoScrollSourceAncestor {
        /// Name of the offending region.
        region: String,
    },

    /// The configuration was invalid.
    InvalidConfig {
        /// Description of the issue
        message: String,

        /// Offending config object
        config: Config,
    },

    /// The configuration text could not be parsed.
    Yaml(serde_yaml::Error),
}

impl Error {
    /// Convenient method to create an error from a message and a problematic config.
    pub fn invalid_config<S: Into<String>>(message: S, config: &Config) -> Self {
        Error::InvalidConfig {
            message: message.into(),
            config: config.clone(),
        }
    }

    /// Name of the region this error is about, if known.
    pub fn region(&self) -> Option<&str> {
        match self {
            Error::MissingRequiredChildReference { region, .. }
            | Error::NoScrollSourceAncestor { region } => Some(region),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingRequiredChildReference { region, attribute } => write!(
                f,
                "{region}: the {attribute} attribute is required and must refer to a valid child"
            ),
            Error::NoScrollSourceAncestor { region } => write!(
                f,
                "{region}: a sync region must be inside a scroll source, directly or indirectly"
            ),
            Error::InvalidConfig { message, config } => {
                write!(f, "invalid config: {message} (in {config})")
            }
            Error::Yaml(err) => write!(f, "could not parse config: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Yaml(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_region_and_attribute() {
        let err = Error::MissingRequiredChildReference {
            region: "inbox".into(),
            attribute: Attribute::Placeholder,
        };
        assert_eq!(err.region(), Some("inbox"));
        assert_eq!(
            err.to_string(),
            "inbox: the placeholder attribute is required and must refer to a valid child"
        );

        let err = Error::NoScrollSourceAncestor {
            region: "inbox".into(),
        };
        assert!(err.to_string().starts_with("inbox: "));
    }
}
