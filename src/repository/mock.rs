use mockall::mock;

use super::{
    CatalogCommitter, ProductReader, ProductWriter, RepositoryResult, TagReader, TagWriter,
};
use crate::domain::{
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
    product_tag::PendingChange,
    tag::{NewTag, Tag, TagType},
};

mock! {
    /// Every store trait on one object, for code that needs the whole catalog.
    pub CatalogStore {}

    impl ProductReader for CatalogStore {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    }

    impl ProductWriter for CatalogStore {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32) -> RepositoryResult<Product>;
        fn increment_view_count(&self, product_id: i32) -> RepositoryResult<()>;
    }

    impl TagReader for CatalogStore {
        fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<Tag>>;
        fn get_tag_by_alias(&self, alias: &str, tag_type: TagType) -> RepositoryResult<Option<Tag>>;
        fn list_tags_for_product(&self, product_id: i32) -> RepositoryResult<Vec<Tag>>;
    }

    impl TagWriter for CatalogStore {
        fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag>;
    }

    impl CatalogCommitter for CatalogStore {
        fn commit(&self, changes: &[PendingChange]) -> RepositoryResult<()>;
    }
}
