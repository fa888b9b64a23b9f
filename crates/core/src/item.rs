use std::fs;
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::time::parse_pubdate;

/// One entry of a news feed, as handed over by the ingestion side.
///
/// Markup and entity decoding have already been applied to `title` and
/// `description`. Items are never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(default)]
    guid: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    link: String,
    /// `None` when the feed's date could not be resolved to an absolute instant.
    #[serde(default, deserialize_with = "deserialize_pubdate")]
    published: Option<DateTime<FixedOffset>>,
}

/// Accepts any feed date shape [`parse_pubdate`] knows. Unparsable strings
/// become `None` so one bad date does not reject the whole batch.
fn deserialize_pubdate<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_pubdate))
}

impl NewsItem {
    /// Parse a JSON array of items.
    pub fn parse_batch(json: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON batch file.
    pub fn load_batch(path: impl AsRef<Path>) -> Result<Vec<Self>> {
        let raw = fs::read_to_string(path)?;
        let items = Self::parse_batch(&raw)?;
        tracing::debug!(items = items.len(), "loaded news batch");
        Ok(items)
    }

    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            guid: None,
            title: title.into(),
            description: description.into(),
            link: String::new(),
            published: None,
        }
    }

    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.guid = Some(guid.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    pub fn with_published(mut self, published: DateTime<FixedOffset>) -> Self {
        self.published = Some(published);
        self
    }

    pub fn guid(&self) -> Option<&str> {
        self.guid.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn published(&self) -> Option<&DateTime<FixedOffset>> {
        self.published.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NewswatchError;

    #[test]
    fn deserializes_batch_from_json() {
        let items: Vec<NewsItem> = serde_json::from_str(
            r#"[
                {
                    "guid": "a1",
                    "title": "Election results in",
                    "description": "Counting continues",
                    "link": "https://news.example/a1",
                    "published": "2016-10-04T12:00:00-04:00"
                },
                { "title": "Weather" }
            ]"#,
        )
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].guid(), Some("a1"));
        assert_eq!(
            items[0].published().unwrap().to_rfc3339(),
            "2016-10-04T12:00:00-04:00"
        );
        assert_eq!(items[1].description(), "");
        assert!(items[1].published().is_none());
    }

    #[test]
    fn pubdate_shapes_resolve_per_item() {
        let items = NewsItem::parse_batch(
            r#"[
                { "guid": "rfc2822", "published": "Tue, 04 Oct 2016 12:00:00 GMT" },
                { "guid": "offset", "published": "Tue, 04 Oct 2016 12:00:00 +0200" },
                { "guid": "iso", "published": "2016-10-04T12:00:00Z" },
                { "guid": "garbage", "published": "sometime last week" },
                { "guid": "null", "published": null }
            ]"#,
        )
        .unwrap();

        assert_eq!(items.len(), 5);
        assert_eq!(items[0].published().unwrap().timestamp(), 1_475_582_400);
        assert_eq!(items[1].published().unwrap().offset().local_minus_utc(), 7_200);
        assert_eq!(items[2].published().unwrap().timestamp(), 1_475_582_400);
        assert!(items[3].published().is_none());
        assert!(items[4].published().is_none());
    }

    #[test]
    fn serialized_item_reads_back() {
        let when = DateTime::parse_from_rfc3339("2016-10-04T12:00:00-04:00").unwrap();
        let item = NewsItem::new("t", "d").with_published(when);
        let json = serde_json::to_string(&[&item]).unwrap();
        assert_eq!(NewsItem::parse_batch(&json).unwrap(), vec![item]);
    }

    #[test]
    fn malformed_batch_is_serialize_error() {
        let err = NewsItem::parse_batch("{ not json").unwrap_err();
        assert!(matches!(err, NewswatchError::Serialize(_)));
    }

    #[test]
    fn load_batch_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("items.json");
        fs::write(&path, r#"[{ "title": "Election results in" }]"#).unwrap();

        let items = NewsItem::load_batch(&path).unwrap();
        assert_eq!(items[0].title(), "Election results in");

        let err = NewsItem::load_batch(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, NewswatchError::Io(_)));
    }

    #[test]
    fn builder_sets_fields() {
        let when = DateTime::parse_from_rfc3339("2016-10-04T12:00:00+00:00").unwrap();
        let item = NewsItem::new("t", "d")
            .with_guid("g")
            .with_link("l")
            .with_published(when);

        assert_eq!(item.title(), "t");
        assert_eq!(item.description(), "d");
        assert_eq!(item.link(), "l");
        assert_eq!(item.published(), Some(&when));
    }
}
