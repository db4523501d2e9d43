use serde::ser::{Serialize, SerializeMap, Serializer};

pub const NAME: &str = "Name";
pub const CATEGORY: &str = "Category";
pub const DESCRIPTION: &str = "Description";

/// One newsletter row. Fields keep the column order of the source
/// file.
#[derive(Clone, Debug, PartialEq)]
pub struct NewsletterRecord {
    fields: Vec<(String, String)>,
}

impl NewsletterRecord {
    pub fn new<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn name(&self) -> Option<&str> {
        self.get(NAME)
    }

    /// The record's category label. Empty cells count as no category.
    pub fn category(&self) -> Option<&str> {
        self.get(CATEGORY).filter(|c| !c.is_empty())
    }

    pub fn description(&self) -> Option<&str> {
        self.get(DESCRIPTION)
    }
}

// Serialized as a map to keep the column names
impl Serialize for NewsletterRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_access() {
        let record = NewsletterRecord::new([
            ("Name", "Morning Brew"),
            ("Category", "Business"),
            ("Price", "$1000"),
        ]);
        assert_eq!(record.name(), Some("Morning Brew"));
        assert_eq!(record.category(), Some("Business"));
        assert_eq!(record.get("Price"), Some("$1000"));
        assert_eq!(record.description(), None);
        assert_eq!(
            record.fields().map(|(k, _)| k).collect::<Vec<_>>(),
            vec!["Name", "Category", "Price"]
        );
    }

    #[test]
    fn test_serialize_as_map() {
        let record = NewsletterRecord::new([("Name", "TLDR"), ("Category", "Tech")]);
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"Name":"TLDR","Category":"Tech"}"#
        );
    }

    #[test]
    fn test_empty_category() {
        let record = NewsletterRecord::new([("Name", "Untitled"), ("Category", "")]);
        assert_eq!(record.category(), None);
    }
}
