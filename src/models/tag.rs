use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::tag::{NewTag as DomainNewTag, Tag as DomainTag, TagType};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::tags)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub alias: String,
    pub tag_type: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::tags)]
pub struct NewTag<'a> {
    pub name: &'a str,
    pub alias: &'a str,
    pub tag_type: &'a str,
}

impl From<Tag> for DomainTag {
    fn from(value: Tag) -> Self {
        let tag_type = TagType::try_from(value.tag_type.as_str()).unwrap_or_else(|err| {
            log::warn!("Tag {} has {err}; treating it as a product tag", value.id);
            TagType::Product
        });

        Self {
            id: value.id,
            name: value.name,
            alias: value.alias,
            tag_type,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewTag> for NewTag<'a> {
    fn from(value: &'a DomainNewTag) -> Self {
        Self {
            name: value.name.as_str(),
            alias: value.alias.as_str(),
            tag_type: value.tag_type.as_str(),
        }
    }
}
