use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use crate::domain::product::Product;
use crate::forms::products::{ProductForm, SellProductForm};
use crate::repository::CatalogStore;
use crate::services::catalog::CatalogService;
use crate::services::storefront::ProductView;
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the back office product list.
#[derive(Debug, Default, Deserialize)]
pub struct AdminProductsQuery {
    /// Optional search string entered by the user.
    pub keyword: Option<String>,
}

/// Data required to render the back office product list.
pub struct AdminProductsPageData {
    pub products: Vec<ProductView>,
    /// Search query echoed back to the view when present.
    pub keyword: Option<String>,
}

/// Data required to render the product editor.
pub struct ProductEditorData {
    pub product: ProductView,
    /// Current tags as the comma separated list the form expects.
    pub tags: String,
}

/// Loads every product, or those matching the keyword in name or description.
pub fn load_admin_products<R>(
    repo: &R,
    query: AdminProductsQuery,
) -> ServiceResult<AdminProductsPageData>
where
    R: CatalogStore + ?Sized,
{
    let catalog = CatalogService::new(repo);
    let keyword = query
        .keyword
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    let products = catalog.get_all(keyword.as_deref())?;

    Ok(AdminProductsPageData {
        products: products.into_iter().map(ProductView::from).collect(),
        keyword,
    })
}

/// Loads a product (published or not) for editing.
pub fn load_product_editor<R>(repo: &R, product_id: i32) -> ServiceResult<ProductEditorData>
where
    R: CatalogStore + ?Sized,
{
    let catalog = CatalogService::new(repo);
    let product = catalog.get_by_id(product_id)?;
    let tags = catalog
        .tags_for_product(product.id)?
        .into_iter()
        .map(|tag| tag.name)
        .collect::<Vec<_>>()
        .join(", ");

    Ok(ProductEditorData {
        product: product.into(),
        tags,
    })
}

/// Creates a product together with its tags.
pub fn create_product<R>(repo: &R, form: ProductForm) -> ServiceResult<Product>
where
    R: CatalogStore + ?Sized,
{
    let new_product = form
        .into_new_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let mut catalog = CatalogService::new(repo);
    let product = catalog.add(new_product)?;
    catalog.save()?;

    Ok(product)
}

/// Overwrites a product with the submitted form, replacing its tags.
pub fn edit_product<R>(repo: &R, product_id: i32, form: ProductForm) -> ServiceResult<Product>
where
    R: CatalogStore + ?Sized,
{
    let mut catalog = CatalogService::new(repo);
    let current = catalog.get_by_id(product_id)?;

    let updates = form
        .into_update_product(&current, Utc::now().naive_utc())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let product = catalog.update(product_id, updates)?;
    catalog.save()?;

    Ok(product)
}

/// Deletes a product and its tag associations.
pub fn remove_product<R>(repo: &R, product_id: i32) -> ServiceResult<Product>
where
    R: CatalogStore + ?Sized,
{
    let mut catalog = CatalogService::new(repo);
    catalog.delete(product_id)
}

/// Sells units of a product and persists the new stock level.
pub fn sell_stock<R>(repo: &R, product_id: i32, form: SellProductForm) -> ServiceResult<Product>
where
    R: CatalogStore + ?Sized,
{
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let mut catalog = CatalogService::new(repo);
    let product = catalog.sell_product(product_id, form.quantity)?;
    catalog.save()?;

    log::info!(
        "Sold {} units of product {}, {} left",
        form.quantity,
        product.id,
        product.quantity
    );

    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::domain::product_tag::PendingChange;
    use crate::domain::tag::{Tag, TagType};
    use crate::repository::RepositoryError;
    use crate::repository::mock::MockCatalogStore;

    fn fixed_datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("valid datetime")
    }

    fn sample_product(id: i32, quantity: i32) -> Product {
        Product {
            id,
            name: "Phone".to_string(),
            description: None,
            price_cents: 50_000,
            quantity,
            category_id: 1,
            status: true,
            hot_flag: false,
            view_count: 0,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn sample_tag(id: i32, name: &str) -> Tag {
        Tag {
            id,
            name: name.to_string(),
            alias: name.to_lowercase(),
            tag_type: TagType::Product,
            created_at: fixed_datetime(),
        }
    }

    fn product_form(tags: &str) -> ProductForm {
        ProductForm {
            name: "Phone".to_string(),
            description: None,
            price: "500".to_string(),
            quantity: 3,
            category_id: 1,
            tags: Some(tags.to_string()),
            status: true,
            hot_flag: false,
        }
    }

    #[test]
    fn admin_list_passes_keyword_as_search() {
        let mut repo = MockCatalogStore::new();
        repo.expect_list_products()
            .times(1)
            .withf(|query| query.search.as_deref() == Some("phone") && !query.published_only)
            .returning(|_| Ok((1, vec![sample_product(1, 3)])));

        let data = load_admin_products(
            &repo,
            AdminProductsQuery {
                keyword: Some(" phone ".to_string()),
            },
        )
        .expect("expected success");

        assert_eq!(data.keyword.as_deref(), Some("phone"));
        assert_eq!(data.products.len(), 1);
    }

    #[test]
    fn admin_list_ignores_blank_keyword() {
        let mut repo = MockCatalogStore::new();
        repo.expect_list_products()
            .times(1)
            .withf(|query| query.search.is_none())
            .returning(|_| Ok((0, Vec::new())));

        let data = load_admin_products(
            &repo,
            AdminProductsQuery {
                keyword: Some("   ".to_string()),
            },
        )
        .expect("expected success");

        assert!(data.keyword.is_none());
    }

    #[test]
    fn editor_joins_tag_names() {
        let mut repo = MockCatalogStore::new();
        repo.expect_get_product_by_id()
            .returning(|id| Ok(Some(sample_product(id, 3))));
        repo.expect_list_tags_for_product()
            .returning(|_| Ok(vec![sample_tag(1, "Android"), sample_tag(2, "5G")]));

        let data = load_product_editor(&repo, 4).expect("editor data");

        assert_eq!(data.product.id, 4);
        assert_eq!(data.tags, "Android, 5G");
    }

    #[test]
    fn create_product_commits_tag_links() {
        let mut repo = MockCatalogStore::new();
        repo.expect_create_product()
            .times(1)
            .returning(|_| Ok(sample_product(10, 3)));
        repo.expect_get_tag_by_alias()
            .returning(|alias, _| Ok(Some(sample_tag(7, alias))));
        repo.expect_commit()
            .times(1)
            .withf(|changes| {
                changes
                    == [PendingChange::ReplaceProductTags {
                        product_id: 10,
                        tag_ids: vec![7],
                    }]
            })
            .returning(|_| Ok(()));

        let product = create_product(&repo, product_form("android")).expect("created");

        assert_eq!(product.id, 10);
    }

    #[test]
    fn create_product_reports_form_errors() {
        let mut repo = MockCatalogStore::new();
        repo.expect_create_product().times(0);

        let mut form = product_form("");
        form.price = "free".to_string();

        let result = create_product(&repo, form);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn edit_product_of_missing_product_is_not_found() {
        let mut repo = MockCatalogStore::new();
        repo.expect_get_product_by_id().returning(|_| Ok(None));
        repo.expect_update_product().times(0);

        let result = edit_product(&repo, 99, product_form(""));

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn edit_product_with_empty_tags_clears_associations() {
        let mut repo = MockCatalogStore::new();
        repo.expect_get_product_by_id()
            .returning(|id| Ok(Some(sample_product(id, 3))));
        repo.expect_update_product()
            .times(1)
            .withf(|id, updates| *id == 5 && updates.tags.as_deref() == Some(""))
            .returning(|id, _| Ok(sample_product(id, 3)));
        repo.expect_commit()
            .times(1)
            .withf(|changes| {
                changes
                    == [PendingChange::ReplaceProductTags {
                        product_id: 5,
                        tag_ids: Vec::new(),
                    }]
            })
            .returning(|_| Ok(()));

        assert!(edit_product(&repo, 5, product_form("")).is_ok());
    }

    #[test]
    fn remove_product_maps_missing_row_to_not_found() {
        let mut repo = MockCatalogStore::new();
        repo.expect_delete_product()
            .returning(|_| Err(RepositoryError::NotFound));

        assert!(matches!(
            remove_product(&repo, 3),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn sell_stock_commits_compare_and_set() {
        let mut repo = MockCatalogStore::new();
        repo.expect_get_product_by_id()
            .returning(|id| Ok(Some(sample_product(id, 5))));
        repo.expect_commit()
            .times(1)
            .withf(|changes| {
                changes
                    == [PendingChange::SetStock {
                        product_id: 2,
                        expected: 5,
                        quantity: 3,
                    }]
            })
            .returning(|_| Ok(()));

        let product = sell_stock(&repo, 2, SellProductForm { quantity: 2 }).expect("sold");

        assert_eq!(product.quantity, 3);
    }

    #[test]
    fn sell_stock_rejects_oversell() {
        let mut repo = MockCatalogStore::new();
        repo.expect_get_product_by_id()
            .returning(|id| Ok(Some(sample_product(id, 1))));
        repo.expect_commit().times(0);

        let result = sell_stock(&repo, 2, SellProductForm { quantity: 4 });

        assert!(matches!(
            result,
            Err(ServiceError::InsufficientStock {
                requested: 4,
                available: 1,
                ..
            })
        ));
    }

    #[test]
    fn sell_stock_rejects_zero_quantity_form() {
        let mut repo = MockCatalogStore::new();
        repo.expect_get_product_by_id().times(0);

        let result = sell_stock(&repo, 2, SellProductForm { quantity: 0 });

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn sell_stock_surfaces_concurrent_change() {
        let mut repo = MockCatalogStore::new();
        repo.expect_get_product_by_id()
            .returning(|id| Ok(Some(sample_product(id, 5))));
        repo.expect_commit()
            .returning(|_| Err(RepositoryError::Conflict));

        let result = sell_stock(&repo, 2, SellProductForm { quantity: 1 });

        assert!(matches!(result, Err(ServiceError::Conflict)));
    }
}
