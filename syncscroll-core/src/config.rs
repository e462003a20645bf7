//! Declaring sync regions from configuration.
//!
//! A region is declared with the name of its placeholder child, the name of
//! its floating child, and a gravity:
//!
//! ```yaml
//! name: inbox
//! placeholder: header_space
//! floating: header
//! gravity: center
//! ```
//!
//! The camel-case attribute names of older declarations (`placeholderView`,
//! `synchronizedView`, `syncView_gravity`) are accepted as well, and gravity
//! can be given as `0`, `1` or `2`.
//!
//! `capped: false` lets the floating view keep following the viewport once
//! the region is scrolled out, instead of stopping at the region bottom.

use crate::error::{Attribute, Error};
use crate::gravity::Gravity;

/// Type of a config item.
pub type Config = serde_json::Value;

const DEFAULT_NAME: &str = "SyncRegion";

const PLACEHOLDER_KEYS: &[&str] = &["placeholder", "placeholderView"];
const FLOATING_KEYS: &[&str] = &["floating", "synchronizedView"];
const GRAVITY_KEYS: &[&str] = &["gravity", "syncView_gravity"];
const CAPPED_KEY: &str = "capped";

/// Region declaration, as read from a config.
///
/// Child references may still be missing; [`resolve`](RegionConfig::resolve)
/// checks them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionConfig {
    /// Name used in diagnostics.
    pub name: String,
    /// Name of the placeholder child.
    pub placeholder: Option<String>,
    /// Name of the floating child.
    pub floating: Option<String>,
    /// Horizontal alignment of the floating child.
    pub gravity: Gravity,
    /// Whether the floating child stops at the region bottom.
    pub capped: bool,
}

/// Fully resolved region declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSpec {
    /// Name used in diagnostics.
    pub name: String,
    /// Name of the placeholder child.
    pub placeholder: String,
    /// Name of the floating child.
    pub floating: String,
    /// Horizontal alignment of the floating child.
    pub gravity: Gravity,
    /// Whether the floating child stops at the region bottom.
    pub capped: bool,
}

impl RegionSpec {
    /// Creates a spec with the default gravity.
    pub fn new<N, P, F>(name: N, placeholder: P, floating: F) -> Self
    where
        N: Into<String>,
        P: Into<String>,
        F: Into<String>,
    {
        RegionSpec {
            name: name.into(),
            placeholder: placeholder.into(),
            floating: floating.into(),
            gravity: Gravity::default(),
            capped: true,
        }
    }

    /// Sets the gravity.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    /// Sets whether the floating child stops at the region bottom.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn capped(mut self, capped: bool) -> Self {
        self.capped = capped;
        self
    }

    /// Error to report when `attribute` does not match any child.
    pub fn missing(&self, attribute: Attribute) -> Error {
        Error::MissingRequiredChildReference {
            region: self.name.clone(),
            attribute,
        }
    }
}

impl RegionConfig {
    /// Creates an empty declaration.
    pub fn new<S: Into<String>>(name: S) -> Self {
        RegionConfig {
            name: name.into(),
            placeholder: None,
            floating: None,
            gravity: Gravity::default(),
            capped: true,
        }
    }

    /// Reads a declaration from a config object.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let object = config
            .as_object()
            .ok_or_else(|| Error::invalid_config("Expected an object", config))?;

        let name = match object.get("name") {
            None | Some(Config::Null) => DEFAULT_NAME.to_string(),
            Some(Config::String(name)) => name.clone(),
            Some(other) => return Err(Error::invalid_config("Expected a string name", other)),
        };

        Ok(RegionConfig {
            placeholder: find_name(config, PLACEHOLDER_KEYS)?,
            floating: find_name(config, FLOATING_KEYS)?,
            gravity: find_gravity(config)?,
            capped: find_capped(config)?,
            name,
        })
    }

    /// Reads a list of declarations.
    ///
    /// Accepts either an array, or an object with a `regions` array.
    pub fn list_from_config(config: &Config) -> Result<Vec<Self>, Error> {
        let array = match config {
            Config::Array(array) => array,
            Config::Object(object) => match object.get("regions") {
                Some(Config::Array(array)) => array,
                _ => return Err(Error::invalid_config("Expected a `regions` array", config)),
            },
            _ => return Err(Error::invalid_config("Expected an array", config)),
        };

        array.iter().map(Self::from_config).collect()
    }

    /// Parses a declaration from yaml text.
    pub fn from_yaml(source: &str) -> Result<Self, Error> {
        let config: Config = serde_yaml::from_str(source)?;
        Self::from_config(&config)
    }

    /// Parses a list of declarations from yaml text.
    pub fn list_from_yaml(source: &str) -> Result<Vec<Self>, Error> {
        let config: Config = serde_yaml::from_str(source)?;
        Self::list_from_config(&config)
    }

    /// Checks that both child references are present.
    ///
    /// If both are missing, the floating reference is the one reported.
    pub fn resolve(&self) -> Result<RegionSpec, Error> {
        let missing = |attribute| Error::MissingRequiredChildReference {
            region: self.name.clone(),
            attribute,
        };

        let floating = self.floating.clone().ok_or_else(|| missing(Attribute::Floating))?;
        let placeholder = self
            .placeholder
            .clone()
            .ok_or_else(|| missing(Attribute::Placeholder))?;

        Ok(RegionSpec {
            name: self.name.clone(),
            placeholder,
            floating,
            gravity: self.gravity,
            capped: self.capped,
        })
    }
}

// Returns the first non-empty string found under any of `keys`.
fn find_name(config: &Config, keys: &[&str]) -> Result<Option<String>, Error> {
    for key in keys {
        match &config[*key] {
            Config::Null => (),
            Config::String(name) if name.is_empty() => (),
            Config::String(name) => return Ok(Some(name.clone())),
            other => return Err(Error::invalid_config(format!("Expected a child name for `{key}`"), other)),
        }
    }
    Ok(None)
}

fn find_gravity(config: &Config) -> Result<Gravity, Error> {
    for key in GRAVITY_KEYS {
        match &config[*key] {
            Config::Null => (),
            Config::String(value) => {
                return value
                    .parse()
                    .map_err(|()| Error::invalid_config("Unknown gravity", &config[*key]));
            }
            Config::Number(value) => {
                return value
                    .as_i64()
                    .and_then(Gravity::from_index)
                    .ok_or_else(|| Error::invalid_config("Unknown gravity", &config[*key]));
            }
            other => return Err(Error::invalid_config("Expected a gravity", other)),
        }
    }
    Ok(Gravity::default())
}

fn find_capped(config: &Config) -> Result<bool, Error> {
    match &config[CAPPED_KEY] {
        Config::Null => Ok(true),
        Config::Bool(capped) => Ok(*capped),
        other => Err(Error::invalid_config("Expected a boolean for `capped`", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn load_full_declaration() {
        let config = json!({
            "name": "inbox",
            "placeholder": "space",
            "floating": "header",
            "gravity": "center",
        });

        let region = RegionConfig::from_config(&config).unwrap();
        assert_eq!(
            region.resolve().unwrap(),
            RegionSpec::new("inbox", "space", "header").gravity(Gravity::Center)
        );
    }

    #[test]
    fn load_layout_attribute_names() {
        let config = json!({
            "placeholderView": "base_view",
            "synchronizedView": "synchronized_view",
            "syncView_gravity": 2,
        });

        let spec = RegionConfig::from_config(&config)
            .unwrap()
            .resolve()
            .unwrap();
        assert_eq!(spec.name, "SyncRegion");
        assert_eq!(spec.placeholder, "base_view");
        assert_eq!(spec.floating, "synchronized_view");
        assert_eq!(spec.gravity, Gravity::End);
    }

    #[test]
    fn missing_references() {
        let region = RegionConfig::from_config(&json!({"name": "a", "floating": "f"})).unwrap();
        match region.resolve() {
            Err(Error::MissingRequiredChildReference { region, attribute }) => {
                assert_eq!(region, "a");
                assert_eq!(attribute, Attribute::Placeholder);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        // With both missing, the floating child is reported.
        let region = RegionConfig::new("b");
        match region.resolve() {
            Err(Error::MissingRequiredChildReference { attribute, .. }) => {
                assert_eq!(attribute, Attribute::Floating);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        // Empty names count as missing.
        let region = RegionConfig::from_config(&json!({"placeholder": "", "floating": "f"})).unwrap();
        assert!(region.resolve().is_err());
    }

    #[test]
    fn invalid_values() {
        assert!(RegionConfig::from_config(&json!("placeholder")).is_err());
        assert!(RegionConfig::from_config(&json!({"placeholder": 3})).is_err());
        assert!(RegionConfig::from_config(&json!({"gravity": "middle"})).is_err());
        assert!(RegionConfig::from_config(&json!({"gravity": 7})).is_err());
        assert!(RegionConfig::from_config(&json!({"gravity": [1]})).is_err());
        assert!(RegionConfig::from_config(&json!({"capped": "no"})).is_err());
    }

    #[test]
    fn load_yaml() {
        let region = RegionConfig::from_yaml(
            r#"
name: gmail
placeholder: toolbar_space
floating: toolbar
"#,
        )
        .unwrap();
        assert_eq!(region.gravity, Gravity::Start);
        assert_eq!(region.floating.as_deref(), Some("toolbar"));

        let regions = RegionConfig::list_from_yaml(
            r#"
regions:
  - name: first
    placeholder: p1
    floating: f1
  - name: second
    placeholder: p2
    floating: f2
    gravity: right
    capped: false
"#,
        )
        .unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[1].gravity, Gravity::End);
        assert!(regions[0].capped);
        assert!(!regions[1].capped);

        assert!(matches!(
            RegionConfig::from_yaml("name: [unclosed"),
            Err(Error::Yaml(_))
        ));
    }
}
