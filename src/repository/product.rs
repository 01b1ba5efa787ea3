use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, ProductListQuery, ProductSort,
    UpdateProduct as DomainUpdateProduct,
};
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
};
use crate::repository::{
    DieselRepository, ProductReader, ProductWriter, RepositoryError, RepositoryResult,
};
use crate::schema::{product_tags, products};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::id.eq(id))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(DomainProduct::from))
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        let mut conn = self.conn()?;

        let total = filtered_products(&query)
            .count()
            .get_result::<i64>(&mut conn)?;
        let total = usize::try_from(total).unwrap_or_default();

        let mut items = filtered_products(&query);

        items = match query.sort {
            ProductSort::Popular => items.order((products::view_count.desc(), products::id.desc())),
            ProductSort::PriceAsc => items.order((products::price_cents.asc(), products::id.desc())),
            ProductSort::PriceDesc => {
                items.order((products::price_cents.desc(), products::id.desc()))
            }
            ProductSort::Newest => items.order((products::created_at.desc(), products::id.desc())),
        };

        if let Some(pagination) = &query.pagination {
            items = items
                .offset(sql_count(pagination.offset()))
                .limit(sql_count(pagination.per_page));
        } else if let Some(limit) = query.limit {
            items = items.limit(sql_count(limit));
        }

        let db_products = items.load::<DbProduct>(&mut conn)?;
        let products = db_products.into_iter().map(DomainProduct::from).collect();

        Ok((total, products))
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;
        let db_new = DbNewProduct::from(new_product);

        let created = diesel::insert_into(products::table)
            .values(&db_new)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(created.into())
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateProduct::from(updates);

        let updated = diesel::update(products::table.filter(products::id.eq(product_id)))
            .set(&db_updates)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainProduct, RepositoryError, _>(|conn| {
            diesel::delete(product_tags::table.filter(product_tags::product_id.eq(product_id)))
                .execute(conn)?;

            let deleted = diesel::delete(products::table.filter(products::id.eq(product_id)))
                .get_result::<DbProduct>(conn)
                .optional()?;

            deleted
                .map(DomainProduct::from)
                .ok_or(RepositoryError::NotFound)
        })
    }

    fn increment_view_count(&self, product_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let updated = diesel::update(products::table.filter(products::id.eq(product_id)))
            .set(products::view_count.eq(products::view_count + 1))
            .execute(&mut conn)?;

        if updated == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

const LIKE_ESCAPE: char = '\\';

/// `LIKE` pattern matching `term` literally anywhere in the column.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Row counts beyond `i64::MAX` are clamped; SQLite binds them as BIGINT.
fn sql_count(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Base query with every filter of `query` applied, without ordering or paging.
fn filtered_products(query: &ProductListQuery) -> products::BoxedQuery<'static, Sqlite> {
    let mut items = products::table.into_boxed::<Sqlite>();

    if query.published_only {
        items = items.filter(products::status.eq(true));
    }

    if query.hot_only {
        items = items.filter(products::hot_flag.eq(true));
    }

    if let Some(category_id) = query.category_id {
        items = items.filter(products::category_id.eq(category_id));
    }

    if let Some(exclude_id) = query.exclude_id {
        items = items.filter(products::id.ne(exclude_id));
    }

    if let Some(tag_id) = query.tag_id {
        items = items.filter(
            products::id.eq_any(
                product_tags::table
                    .filter(product_tags::tag_id.eq(tag_id))
                    .select(product_tags::product_id),
            ),
        );
    }

    if let Some(term) = query.search.as_ref() {
        let pattern = contains_pattern(term);
        items = items.filter(
            products::name
                .like(pattern.clone())
                .escape(LIKE_ESCAPE)
                .or(products::description.like(pattern).escape(LIKE_ESCAPE)),
        );
    }

    if let Some(term) = query.name_contains.as_ref() {
        let pattern = contains_pattern(term);
        items = items.filter(products::name.like(pattern).escape(LIKE_ESCAPE));
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("usb"), "%usb%");
        assert_eq!(contains_pattern("50%"), "%50\\%%");
        assert_eq!(contains_pattern("usb_c"), "%usb\\_c%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn sql_count_clamps_large_values() {
        assert_eq!(sql_count(12), 12);
        assert_eq!(sql_count(usize::MAX), i64::MAX);
    }
}
