use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::alias::make_alias;

/// What kind of content a tag classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    Product,
    Post,
}

impl TagType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagType::Product => "product",
            TagType::Post => "post",
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TagType {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "product" => Ok(TagType::Product),
            "post" => Ok(TagType::Post),
            other => Err(format!("unknown tag type `{other}`")),
        }
    }
}

/// Domain representation of a tag that can be attached to many products.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    /// Unique identifier of the tag.
    pub id: i32,
    /// Name as first entered.
    pub name: String,
    /// Normalised form of the name, unique per tag type.
    pub alias: String,
    pub tag_type: TagType,
    /// Timestamp for when the tag record was created.
    pub created_at: NaiveDateTime,
}

/// Payload required to insert a new tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
    pub alias: String,
    pub tag_type: TagType,
}

impl NewTag {
    /// Construct a tag payload with a trimmed name and its derived alias.
    pub fn new(name: impl Into<String>, tag_type: TagType) -> Self {
        let name = name.into().trim().to_string();
        let alias = make_alias(&name);
        Self {
            name,
            alias,
            tag_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tag_derives_alias() {
        let tag = NewTag::new("  Gaming Laptop ", TagType::Product);

        assert_eq!(tag.name, "Gaming Laptop");
        assert_eq!(tag.alias, "gaming-laptop");
        assert_eq!(tag.tag_type, TagType::Product);
    }

    #[test]
    fn tag_type_round_trips_through_str() {
        for tag_type in [TagType::Product, TagType::Post] {
            assert_eq!(TagType::try_from(tag_type.as_str()), Ok(tag_type));
        }
        assert!(TagType::try_from("article").is_err());
    }
}
