use chrono::Local;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::product_tag::{NewProductTag as DomainNewProductTag, PendingChange};
use crate::models::product_tag::NewProductTag as DbNewProductTag;
use crate::repository::{CatalogCommitter, DieselRepository, RepositoryError, RepositoryResult};
use crate::schema::{product_tags, products};

impl CatalogCommitter for DieselRepository {
    fn commit(&self, changes: &[PendingChange]) -> RepositoryResult<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            for change in changes {
                match change {
                    PendingChange::ReplaceProductTags {
                        product_id,
                        tag_ids,
                    } => replace_product_tags(conn, *product_id, tag_ids)?,
                    PendingChange::SetStock {
                        product_id,
                        expected,
                        quantity,
                    } => set_stock(conn, *product_id, *expected, *quantity)?,
                }
            }
            Ok(())
        })
    }
}

/// Reconcile the product's associations so they match `tag_ids` exactly.
fn replace_product_tags(
    conn: &mut SqliteConnection,
    product_id: i32,
    tag_ids: &[i32],
) -> RepositoryResult<()> {
    let existing = product_tags::table
        .filter(product_tags::product_id.eq(product_id))
        .select(product_tags::tag_id)
        .load::<i32>(conn)?;

    let stale: Vec<i32> = existing
        .iter()
        .copied()
        .filter(|tag_id| !tag_ids.contains(tag_id))
        .collect();

    if !stale.is_empty() {
        diesel::delete(
            product_tags::table
                .filter(product_tags::product_id.eq(product_id))
                .filter(product_tags::tag_id.eq_any(&stale)),
        )
        .execute(conn)?;
    }

    let mut missing: Vec<DbNewProductTag> = Vec::new();
    for tag_id in tag_ids {
        let already_linked = existing.contains(tag_id)
            || missing.iter().any(|pending| pending.tag_id == *tag_id);
        if !already_linked {
            missing.push(DbNewProductTag::from(&DomainNewProductTag::new(
                product_id, *tag_id,
            )));
        }
    }

    if !missing.is_empty() {
        diesel::insert_into(product_tags::table)
            .values(&missing)
            .execute(conn)?;
    }

    log::debug!(
        "Product {product_id}: {} tag links removed, {} added",
        stale.len(),
        missing.len()
    );

    Ok(())
}

/// Write the new stock level unless another writer changed it since it was read.
fn set_stock(
    conn: &mut SqliteConnection,
    product_id: i32,
    expected: i32,
    quantity: i32,
) -> RepositoryResult<()> {
    let updated = diesel::update(
        products::table
            .filter(products::id.eq(product_id))
            .filter(products::quantity.eq(expected)),
    )
    .set((
        products::quantity.eq(quantity),
        products::updated_at.eq(Local::now().naive_utc()),
    ))
    .execute(conn)?;

    if updated == 1 {
        return Ok(());
    }

    let exists = diesel::select(diesel::dsl::exists(
        products::table.filter(products::id.eq(product_id)),
    ))
    .get_result::<bool>(conn)?;

    if exists {
        log::warn!("Stock of product {product_id} changed concurrently; expected {expected}");
        Err(RepositoryError::Conflict)
    } else {
        Err(RepositoryError::NotFound)
    }
}
