//! Catalog service: every product and tag operation the storefront and the
//! back office perform, on top of a [`CatalogStore`].
//!
//! The service is request scoped. Tag associations and stock changes are
//! staged in a unit of work and only reach the store when [`CatalogService::save`]
//! is called; product rows and newly discovered tags are written immediately.

use std::collections::BTreeMap;

use crate::domain::alias::parse_tag_list;
use crate::domain::product::{NewProduct, Product, ProductListQuery, ProductSort, UpdateProduct};
use crate::domain::product_tag::PendingChange;
use crate::domain::tag::{NewTag, Tag, TagType};
use crate::pagination::Paginated;
use crate::repository::{CatalogStore, RepositoryError};
use crate::services::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StagedStock {
    /// Quantity read from the store before the first staged sale.
    expected: i32,
    /// Quantity after every staged sale.
    quantity: i32,
}

/// Changes accepted by the service but not yet committed.
#[derive(Debug, Default)]
struct UnitOfWork {
    tag_sets: BTreeMap<i32, Vec<i32>>,
    stock: BTreeMap<i32, StagedStock>,
}

impl UnitOfWork {
    fn is_empty(&self) -> bool {
        self.tag_sets.is_empty() && self.stock.is_empty()
    }

    fn forget(&mut self, product_id: i32) {
        self.tag_sets.remove(&product_id);
        self.stock.remove(&product_id);
    }

    fn clear(&mut self) {
        self.tag_sets.clear();
        self.stock.clear();
    }

    fn changes(&self) -> Vec<PendingChange> {
        let tags = self
            .tag_sets
            .iter()
            .map(|(product_id, tag_ids)| PendingChange::ReplaceProductTags {
                product_id: *product_id,
                tag_ids: tag_ids.clone(),
            });

        let stock = self
            .stock
            .iter()
            .map(|(product_id, staged)| PendingChange::SetStock {
                product_id: *product_id,
                expected: staged.expected,
                quantity: staged.quantity,
            });

        tags.chain(stock).collect()
    }
}

/// Product and tag operations over a store `R`, with a per-instance unit of work.
pub struct CatalogService<'a, R: ?Sized> {
    repo: &'a R,
    pending: UnitOfWork,
}

impl<'a, R> CatalogService<'a, R>
where
    R: CatalogStore + ?Sized,
{
    pub fn new(repo: &'a R) -> Self {
        Self {
            repo,
            pending: UnitOfWork::default(),
        }
    }

    /// Persist a new product and stage its tag associations.
    ///
    /// Tags are resolved before the product row is written, so a failed tag
    /// lookup leaves no product behind. Tags created for a failed insert stay.
    pub fn add(&mut self, new_product: NewProduct) -> ServiceResult<Product> {
        validate_product(&new_product.name, new_product.price_cents, new_product.quantity)?;

        let tag_ids = match new_product.tags.as_deref() {
            Some(raw_tags) => self.resolve_tags(raw_tags)?,
            None => Vec::new(),
        };

        let product = self
            .repo
            .create_product(&new_product)
            .map_err(ServiceError::from)?;
        log::info!("Created product {} `{}`", product.id, product.name);

        if !tag_ids.is_empty() {
            self.pending.tag_sets.insert(product.id, tag_ids);
        }

        Ok(product)
    }

    /// Persist changes to an existing product.
    ///
    /// When `updates.tags` is set the product's associations are staged to be
    /// exactly that list (an empty list removes them all).
    pub fn update(&mut self, product_id: i32, updates: UpdateProduct) -> ServiceResult<Product> {
        validate_product(&updates.name, updates.price_cents, updates.quantity)?;

        let tag_ids = updates
            .tags
            .as_deref()
            .map(|raw_tags| self.resolve_tags(raw_tags))
            .transpose()?;

        let product = self
            .repo
            .update_product(product_id, &updates)
            .map_err(ServiceError::from)?;

        // The update wrote the quantity explicitly; staged sales no longer apply.
        if self.pending.stock.remove(&product_id).is_some() {
            log::warn!("Dropped staged stock change for product {product_id} after update");
        }

        if let Some(tag_ids) = tag_ids {
            self.pending.tag_sets.insert(product.id, tag_ids);
        }

        Ok(product)
    }

    /// Remove a product and return it.
    pub fn delete(&mut self, product_id: i32) -> ServiceResult<Product> {
        let product = self
            .repo
            .delete_product(product_id)
            .map_err(ServiceError::from)?;
        self.pending.forget(product_id);
        log::info!("Deleted product {} `{}`", product.id, product.name);

        Ok(product)
    }

    /// All products, or those whose name or description contains `keyword`.
    pub fn get_all(&self, keyword: Option<&str>) -> ServiceResult<Vec<Product>> {
        let mut query = ProductListQuery::new();
        if let Some(keyword) = non_blank(keyword) {
            query = query.search(keyword);
        }
        self.load(query)
    }

    /// All products, or those whose name contains `keyword`.
    pub fn list_products(&self, keyword: Option<&str>) -> ServiceResult<Vec<Product>> {
        let mut query = ProductListQuery::new();
        if let Some(keyword) = non_blank(keyword) {
            query = query.name_contains(keyword);
        }
        self.load(query)
    }

    pub fn get_by_id(&self, product_id: i32) -> ServiceResult<Product> {
        let product = self
            .repo
            .get_product_by_id(product_id)
            .map_err(ServiceError::from)?
            .ok_or(ServiceError::NotFound)?;

        Ok(self.with_staged_stock(product))
    }

    /// Newest published products.
    pub fn new_arrivals(&self, top: usize) -> ServiceResult<Vec<Product>> {
        self.load(ProductListQuery::new().published().limit(top))
    }

    /// Newest published products flagged as hot.
    pub fn hot_products(&self, top: usize) -> ServiceResult<Vec<Product>> {
        self.load(ProductListQuery::new().published().hot().limit(top))
    }

    /// One page of the published products of a category.
    pub fn list_by_category(
        &self,
        category_id: i32,
        page: usize,
        page_size: usize,
        sort: ProductSort,
    ) -> ServiceResult<Paginated<Product>> {
        let query = ProductListQuery::new().published().category(category_id);
        self.load_page(query, page, page_size, sort)
    }

    /// One page of the published products whose name contains `keyword`.
    pub fn search(
        &self,
        keyword: &str,
        page: usize,
        page_size: usize,
        sort: ProductSort,
    ) -> ServiceResult<Paginated<Product>> {
        let query = ProductListQuery::new()
            .published()
            .name_contains(keyword.trim());
        self.load_page(query, page, page_size, sort)
    }

    /// Published products of the same category as `product_id`, newest first.
    pub fn related_products(&self, product_id: i32, top: usize) -> ServiceResult<Vec<Product>> {
        let source = self.get_by_id(product_id)?;

        let query = ProductListQuery::new()
            .published()
            .category(source.category_id)
            .exclude(source.id)
            .limit(top);
        self.load(query)
    }

    pub fn tags_for_product(&self, product_id: i32) -> ServiceResult<Vec<Tag>> {
        self.repo
            .list_tags_for_product(product_id)
            .map_err(ServiceError::from)
    }

    pub fn get_tag(&self, tag_id: i32) -> ServiceResult<Tag> {
        self.repo
            .get_tag_by_id(tag_id)
            .map_err(ServiceError::from)?
            .ok_or(ServiceError::NotFound)
    }

    /// One page of the published products carrying `tag_id`.
    pub fn list_by_tag(
        &self,
        tag_id: i32,
        page: usize,
        page_size: usize,
        sort: ProductSort,
    ) -> ServiceResult<Paginated<Product>> {
        let query = ProductListQuery::new().published().tag(tag_id);
        self.load_page(query, page, page_size, sort)
    }

    /// Names of published products containing `term`, for search suggestions.
    pub fn product_name_suggestions(&self, term: &str) -> ServiceResult<Vec<String>> {
        let Some(term) = non_blank(Some(term)) else {
            return Ok(Vec::new());
        };

        let query = ProductListQuery::new().published().name_contains(term);
        let products = self.load(query)?;
        Ok(products.into_iter().map(|product| product.name).collect())
    }

    /// Take `quantity` units out of stock.
    ///
    /// Only the in-memory quantity changes: the caller must call
    /// [`save`](Self::save) for the sale to be persisted. Returns the product
    /// with its new quantity.
    pub fn sell_product(&mut self, product_id: i32, quantity: i32) -> ServiceResult<Product> {
        if quantity < 0 {
            return Err(ServiceError::Validation(format!(
                "cannot sell a negative quantity ({quantity})"
            )));
        }

        let mut product = self.get_by_id(product_id)?;
        let available = product.quantity;

        if quantity > available {
            return Err(ServiceError::InsufficientStock {
                product_id,
                requested: quantity,
                available,
            });
        }

        let expected = self
            .pending
            .stock
            .get(&product_id)
            .map(|staged| staged.expected)
            .unwrap_or(available);

        product.quantity = available - quantity;
        self.pending.stock.insert(
            product_id,
            StagedStock {
                expected,
                quantity: product.quantity,
            },
        );

        Ok(product)
    }

    /// Count a product page view. Written immediately.
    pub fn record_view(&self, product_id: i32) -> ServiceResult<()> {
        self.repo
            .increment_view_count(product_id)
            .map_err(ServiceError::from)
    }

    /// Resolve every tag of a comma separated list to a tag id, creating the
    /// tags whose alias is not known yet. Duplicate aliases collapse to one id.
    pub fn resolve_tags(&self, raw_tags: &str) -> ServiceResult<Vec<i32>> {
        let mut tag_ids = Vec::new();

        for (name, alias) in parse_tag_list(raw_tags) {
            let existing = self
                .repo
                .get_tag_by_alias(&alias, TagType::Product)
                .map_err(ServiceError::from)?;

            let tag = match existing {
                Some(tag) => tag,
                None => self.create_tag(&name, &alias)?,
            };
            tag_ids.push(tag.id);
        }

        Ok(tag_ids)
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drop every staged change without writing it.
    pub fn discard_changes(&mut self) {
        self.pending.clear();
    }

    /// Commit every staged change in one transaction.
    ///
    /// On failure nothing is written and the staged changes are kept.
    pub fn save(&mut self) -> ServiceResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let changes = self.pending.changes();
        match self.repo.commit(&changes) {
            Ok(()) => {
                log::info!("Committed {} catalog changes", changes.len());
                self.pending.clear();
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to commit {} catalog changes: {err}", changes.len());
                Err(ServiceError::from(err))
            }
        }
    }

    fn create_tag(&self, name: &str, alias: &str) -> ServiceResult<Tag> {
        match self.repo.create_tag(&NewTag::new(name, TagType::Product)) {
            Ok(tag) => {
                log::info!("Created tag {} `{}`", tag.id, tag.alias);
                Ok(tag)
            }
            // Another request inserted the same alias first.
            Err(RepositoryError::Conflict) => self
                .repo
                .get_tag_by_alias(alias, TagType::Product)
                .map_err(ServiceError::from)?
                .ok_or(ServiceError::Conflict),
            Err(err) => Err(ServiceError::from(err)),
        }
    }

    fn load(&self, query: ProductListQuery) -> ServiceResult<Vec<Product>> {
        let (_, products) = self
            .repo
            .list_products(query)
            .map_err(ServiceError::from)?;

        Ok(products
            .into_iter()
            .map(|product| self.with_staged_stock(product))
            .collect())
    }

    fn load_page(
        &self,
        query: ProductListQuery,
        page: usize,
        page_size: usize,
        sort: ProductSort,
    ) -> ServiceResult<Paginated<Product>> {
        check_page(page, page_size)?;

        let query = query.sort(sort).paginate(page, page_size);
        let (total, products) = self
            .repo
            .list_products(query)
            .map_err(ServiceError::from)?;

        let products = products
            .into_iter()
            .map(|product| self.with_staged_stock(product))
            .collect();

        Ok(Paginated::new(products, page, page_size, total))
    }

    fn with_staged_stock(&self, mut product: Product) -> Product {
        if let Some(staged) = self.pending.stock.get(&product.id) {
            product.quantity = staged.quantity;
        }
        product
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn check_page(page: usize, page_size: usize) -> ServiceResult<()> {
    if page == 0 {
        return Err(ServiceError::Validation("page must be at least 1".into()));
    }
    if page_size == 0 {
        return Err(ServiceError::Validation(
            "page size must be at least 1".into(),
        ));
    }

    // Offset and page size are bound as SQL BIGINTs.
    let offset = (page - 1)
        .checked_mul(page_size)
        .filter(|offset| i64::try_from(*offset).is_ok());
    if offset.is_none() || i64::try_from(page_size).is_err() {
        return Err(ServiceError::Validation(format!(
            "page {page} of size {page_size} is out of range"
        )));
    }

    Ok(())
}

fn validate_product(name: &str, price_cents: i64, quantity: i32) -> ServiceResult<()> {
    if name.trim().is_empty() {
        return Err(ServiceError::Validation("product name is empty".into()));
    }
    if price_cents < 0 {
        return Err(ServiceError::Validation(format!(
            "price cannot be negative ({price_cents})"
        )));
    }
    if quantity < 0 {
        return Err(ServiceError::Validation(format!(
            "quantity cannot be negative ({quantity})"
        )));
    }
    Ok(())
}
