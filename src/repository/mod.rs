use crate::db::{DbConnection, DbPool};
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};
use crate::domain::product_tag::PendingChange;
use crate::domain::tag::{NewTag, Tag, TagType};

pub mod commit;
pub mod errors;
pub mod product;
pub mod tag;

#[cfg(test)]
pub mod mock;

pub use errors::{RepositoryError, RepositoryResult};

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over product records.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    /// Returns the number of rows matching the filters (ignoring pagination
    /// and limit) together with the requested page.
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
}

/// Write operations over product records.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(&self, product_id: i32, updates: &UpdateProduct)
    -> RepositoryResult<Product>;
    /// Deletes the product and its tag associations, returning the removed row.
    fn delete_product(&self, product_id: i32) -> RepositoryResult<Product>;
    fn increment_view_count(&self, product_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over tag records.
pub trait TagReader {
    fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<Tag>>;
    fn get_tag_by_alias(&self, alias: &str, tag_type: TagType) -> RepositoryResult<Option<Tag>>;
    /// Tags attached to the product, in association order.
    fn list_tags_for_product(&self, product_id: i32) -> RepositoryResult<Vec<Tag>>;
}

/// Write operations over tag records.
pub trait TagWriter {
    fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag>;
}

/// Applies a batch of staged catalog changes atomically.
pub trait CatalogCommitter {
    fn commit(&self, changes: &[PendingChange]) -> RepositoryResult<()>;
}

/// Everything the catalog service needs from a store.
pub trait CatalogStore:
    ProductReader + ProductWriter + TagReader + TagWriter + CatalogCommitter
{
}

impl<T> CatalogStore for T where
    T: ProductReader + ProductWriter + TagReader + TagWriter + CatalogCommitter + ?Sized
{
}
