//! Front-matter parsing

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter data from a temp page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Split a document into its front matter and body.
    ///
    /// Documents without a leading `---` block get the default front matter.
    /// A block that is present but not valid YAML is an error.
    pub fn parse(content: &str) -> Result<(Self, &str), serde_yaml::Error> {
        let trimmed = content.trim_start_matches('\u{feff}');
        let Some(rest) = trimmed.strip_prefix("---") else {
            return Ok((FrontMatter::default(), content));
        };
        // `----` or `--- text` is a thematic break or prose, not a fence
        if !rest.starts_with(['\n', '\r']) {
            return Ok((FrontMatter::default(), content));
        }
        let rest = rest.trim_start_matches(['\n', '\r']);

        let (yaml, body) = if let Some(body) = rest.strip_prefix("---") {
            ("", body)
        } else if let Some(end) = rest.find("\n---") {
            (&rest[..end], &rest[end + 4..])
        } else {
            return Ok((FrontMatter::default(), content));
        };
        let body = body.trim_start_matches(['\n', '\r']);

        if yaml.trim().is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml)?;
        Ok((fm, body))
    }

    /// Parse the date field, accepting a bare date or a date with time
    pub fn parse_date(&self) -> Option<NaiveDateTime> {
        let raw = self.date.as_deref()?.trim();
        for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(dt);
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_front_matter() {
        let content = "---\ntitle: Hello\ntags: draft\n---\n# Body\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello"));
        assert_eq!(fm.tags, vec!["draft".to_string()]);
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn test_no_front_matter() {
        let content = "# Just a heading\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert!(fm.title.is_none());
        assert_eq!(body, content);
    }

    #[test]
    fn test_thematic_break_is_not_front_matter() {
        let content = "----\nprose\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert!(fm.title.is_none());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_front_matter() {
        let (fm, body) = FrontMatter::parse("---\n---\nbody").unwrap();
        assert!(fm.title.is_none());
        assert_eq!(body, "body");
    }

    #[test]
    fn test_malformed_front_matter_is_an_error() {
        let content = "---\ntitle: [unclosed\n---\nbody";
        assert!(FrontMatter::parse(content).is_err());
    }

    #[test]
    fn test_extra_fields_and_tag_list() {
        let content = "---\ntags: [a, b]\nmood: curious\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, vec!["a".to_string(), "b".to_string()]);
        assert!(fm.extra.contains_key("mood"));
    }

    #[test]
    fn test_parse_date() {
        let fm = FrontMatter {
            date: Some("2024-03-01".to_string()),
            ..Default::default()
        };
        let date = fm.parse_date().unwrap();
        assert_eq!(date.format("%Y-%m-%d").to_string(), "2024-03-01");

        let fm = FrontMatter {
            date: Some("2024-03-01 10:30:00".to_string()),
            ..Default::default()
        };
        assert_eq!(
            fm.parse_date().unwrap().format("%H:%M").to_string(),
            "10:30"
        );
    }
}
