use diesel::prelude::*;

use crate::domain::tag::{NewTag as DomainNewTag, Tag as DomainTag, TagType};
use crate::models::tag::{NewTag as DbNewTag, Tag as DbTag};
use crate::repository::{DieselRepository, RepositoryResult, TagReader, TagWriter};
use crate::schema::{product_tags, tags};

impl TagReader for DieselRepository {
    fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<DomainTag>> {
        let mut conn = self.conn()?;
        let tag = tags::table
            .filter(tags::id.eq(id))
            .first::<DbTag>(&mut conn)
            .optional()?;

        Ok(tag.map(DomainTag::from))
    }

    fn get_tag_by_alias(
        &self,
        alias: &str,
        tag_type: TagType,
    ) -> RepositoryResult<Option<DomainTag>> {
        let mut conn = self.conn()?;
        let tag = tags::table
            .filter(tags::alias.eq(alias))
            .filter(tags::tag_type.eq(tag_type.as_str()))
            .first::<DbTag>(&mut conn)
            .optional()?;

        Ok(tag.map(DomainTag::from))
    }

    fn list_tags_for_product(&self, product_id: i32) -> RepositoryResult<Vec<DomainTag>> {
        let mut conn = self.conn()?;
        let db_tags = product_tags::table
            .inner_join(tags::table)
            .filter(product_tags::product_id.eq(product_id))
            .order(product_tags::id.asc())
            .select(DbTag::as_select())
            .load::<DbTag>(&mut conn)?;

        Ok(db_tags.into_iter().map(DomainTag::from).collect())
    }
}

impl TagWriter for DieselRepository {
    fn create_tag(&self, new_tag: &DomainNewTag) -> RepositoryResult<DomainTag> {
        let mut conn = self.conn()?;
        let insertable = DbNewTag::from(new_tag);

        let created = diesel::insert_into(tags::table)
            .values(&insertable)
            .get_result::<DbTag>(&mut conn)?;

        Ok(created.into())
    }
}
