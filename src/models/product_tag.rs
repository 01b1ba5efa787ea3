use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product_tag::NewProductTag as DomainNewProductTag;

/// Row linking a product to a tag.
#[derive(Insertable)]
#[diesel(table_name = crate::schema::product_tags)]
pub struct NewProductTag {
    pub product_id: i32,
    pub tag_id: i32,
    pub created_at: NaiveDateTime,
}

impl From<&DomainNewProductTag> for NewProductTag {
    fn from(value: &DomainNewProductTag) -> Self {
        Self {
            product_id: value.product_id,
            tag_id: value.tag_id,
            created_at: value.linked_at,
        }
    }
}
