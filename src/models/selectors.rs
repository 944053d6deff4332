// src/models/selectors.rs

//! Declarative CSS selector rules for extracting events from a page.

use serde::{Deserialize, Deserializer, Serialize};

/// A record field that can be extracted from a container element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Date,
    Description,
    Link,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Date => "date",
            Field::Description => "description",
            Field::Link => "link",
        }
    }
}

/// Ordered selector lists per field. For each list, the first selector that
/// matches wins; container selectors accumulate instead.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SelectorRules {
    /// Selectors for event container elements
    #[serde(default, deserialize_with = "one_or_many")]
    pub container: Vec<String>,

    /// Selectors for the title element within a container
    #[serde(default, deserialize_with = "one_or_many")]
    pub title: Vec<String>,

    /// Selectors for the date element within a container
    #[serde(default, deserialize_with = "one_or_many")]
    pub date: Vec<String>,

    /// Selectors for the description element within a container
    #[serde(default, deserialize_with = "one_or_many")]
    pub description: Vec<String>,

    /// Selectors for the link element within a container
    #[serde(default, deserialize_with = "one_or_many")]
    pub link: Vec<String>,
}

impl SelectorRules {
    /// Configured selectors for a field, falling back to generic ones when
    /// the field has none.
    pub fn for_field(&self, field: Field) -> Vec<&str> {
        let configured = match field {
            Field::Title => &self.title,
            Field::Date => &self.date,
            Field::Description => &self.description,
            Field::Link => &self.link,
        };
        if configured.is_empty() {
            Self::generic(field).to_vec()
        } else {
            configured.iter().map(String::as_str).collect()
        }
    }

    /// Generic selectors that work with most list-style event pages.
    pub fn generic(field: Field) -> &'static [&'static str] {
        match field {
            Field::Title => &["h1", "h2", "h3", "h4", ".title", "a"],
            Field::Date => &["time", ".date"],
            Field::Description => &["p", ".description", ".summary"],
            Field::Link => &["a"],
        }
    }

    /// Every configured selector string, container first.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.container
            .iter()
            .chain(&self.title)
            .chain(&self.date)
            .chain(&self.description)
            .chain(&self.link)
            .map(String::as_str)
    }
}

/// Accept either `"sel"` or `["sel", ...]`.
fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_or_list() {
        let rules: SelectorRules = serde_json::from_str(
            r#"{"container": ".event", "title": ["h3", ".name"], "unknown": ["x"]}"#,
        )
        .unwrap();

        assert_eq!(rules.container, vec![".event"]);
        assert_eq!(rules.title, vec!["h3", ".name"]);
        assert!(rules.date.is_empty());
    }

    #[test]
    fn test_empty_field_uses_generic() {
        let rules = SelectorRules {
            title: vec![".event-title".into()],
            ..Default::default()
        };

        assert_eq!(rules.for_field(Field::Title), vec![".event-title"]);
        assert_eq!(rules.for_field(Field::Link), vec!["a"]);
    }
}
