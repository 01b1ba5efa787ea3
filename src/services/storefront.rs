use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::StorefrontConfig;
use crate::domain::product::{Product, ProductSort};
use crate::domain::tag::Tag;
use crate::pagination::Paginated;
use crate::repository::CatalogStore;
use crate::services::{ServiceError, ServiceResult};
use crate::services::catalog::CatalogService;

/// Query parameters accepted by paginated listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
    /// Sort key; unknown values fall back to newest first.
    #[serde(default)]
    pub sort: ProductSort,
}

/// Query parameters accepted by the search page.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub page: Option<usize>,
    #[serde(default)]
    pub sort: ProductSort,
}

/// Query parameters of the name suggestion endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SuggestionQuery {
    pub term: Option<String>,
}

/// View model exposed to the storefront templates.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub price_formatted: String,
    pub quantity: i32,
    pub in_stock: bool,
    pub category_id: i32,
    pub status: bool,
    pub hot_flag: bool,
    pub view_count: i32,
    pub created_at: NaiveDateTime,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let Product {
            id,
            name,
            description,
            price_cents,
            quantity,
            category_id,
            status,
            hot_flag,
            view_count,
            created_at,
            ..
        } = product;

        Self {
            id,
            name,
            description,
            price_cents,
            price_formatted: format_price(price_cents),
            quantity,
            in_stock: quantity > 0,
            category_id,
            status,
            hot_flag,
            view_count,
            created_at,
        }
    }
}

/// Render minor units as a decimal amount, e.g. `129950` -> `1299.50`.
pub fn format_price(price_cents: i64) -> String {
    let sign = if price_cents < 0 { "-" } else { "" };
    let cents = price_cents.unsigned_abs();
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}

/// Data required to render the home page.
pub struct HomePageData {
    pub new_arrivals: Vec<ProductView>,
    pub hot_products: Vec<ProductView>,
}

/// Data required to render a paginated product listing.
pub struct ListingPageData {
    pub products: Paginated<ProductView>,
    /// Sort applied, echoed back so the selector keeps its value.
    pub sort: ProductSort,
}

/// Data required to render the search results page.
pub struct SearchPageData {
    pub keyword: String,
    pub listing: ListingPageData,
}

/// Data required to render the tag page.
pub struct TagPageData {
    pub tag: Tag,
    pub listing: ListingPageData,
}

/// Data required to render a product page.
pub struct ProductPageData {
    pub product: ProductView,
    pub tags: Vec<Tag>,
    pub related: Vec<ProductView>,
}

/// Loads the new arrivals and hot products blocks.
pub fn load_home_page<R>(repo: &R, config: &StorefrontConfig) -> ServiceResult<HomePageData>
where
    R: CatalogStore + ?Sized,
{
    let catalog = CatalogService::new(repo);

    let new_arrivals = catalog.new_arrivals(config.new_arrivals_count)?;
    let hot_products = catalog.hot_products(config.hot_products_count)?;

    Ok(HomePageData {
        new_arrivals: new_arrivals.into_iter().map(ProductView::from).collect(),
        hot_products: hot_products.into_iter().map(ProductView::from).collect(),
    })
}

/// Loads one page of a category.
pub fn load_category_page<R>(
    repo: &R,
    config: &StorefrontConfig,
    category_id: i32,
    query: ListingQuery,
) -> ServiceResult<ListingPageData>
where
    R: CatalogStore + ?Sized,
{
    let catalog = CatalogService::new(repo);
    let page = query.page.unwrap_or(1);

    let products = catalog.list_by_category(category_id, page, config.page_size, query.sort)?;

    Ok(ListingPageData {
        products: products.map(ProductView::from),
        sort: query.sort,
    })
}

/// Loads one page of search results.
pub fn load_search_page<R>(
    repo: &R,
    config: &StorefrontConfig,
    query: SearchQuery,
) -> ServiceResult<SearchPageData>
where
    R: CatalogStore + ?Sized,
{
    let catalog = CatalogService::new(repo);
    let keyword = query.keyword.unwrap_or_default().trim().to_string();
    let page = query.page.unwrap_or(1);

    let products = catalog.search(&keyword, page, config.page_size, query.sort)?;

    Ok(SearchPageData {
        keyword,
        listing: ListingPageData {
            products: products.map(ProductView::from),
            sort: query.sort,
        },
    })
}

/// Loads one page of the products carrying a tag.
pub fn load_tag_page<R>(
    repo: &R,
    config: &StorefrontConfig,
    tag_id: i32,
    query: ListingQuery,
) -> ServiceResult<TagPageData>
where
    R: CatalogStore + ?Sized,
{
    let catalog = CatalogService::new(repo);
    let tag = catalog.get_tag(tag_id)?;
    let page = query.page.unwrap_or(1);

    let products = catalog.list_by_tag(tag.id, page, config.page_size, query.sort)?;

    Ok(TagPageData {
        tag,
        listing: ListingPageData {
            products: products.map(ProductView::from),
            sort: query.sort,
        },
    })
}

/// Loads a published product with its tags and related products, counting the view.
pub fn load_product_page<R>(
    repo: &R,
    config: &StorefrontConfig,
    product_id: i32,
) -> ServiceResult<ProductPageData>
where
    R: CatalogStore + ?Sized,
{
    let catalog = CatalogService::new(repo);
    let product = catalog.get_by_id(product_id)?;
    if !product.status {
        return Err(ServiceError::NotFound);
    }

    if let Err(err) = catalog.record_view(product.id) {
        log::warn!("Failed to record a view of product {}: {err}", product.id);
    }

    let tags = catalog.tags_for_product(product.id)?;
    let related = catalog.related_products(product.id, config.related_products_count)?;

    Ok(ProductPageData {
        product: product.into(),
        tags,
        related: related.into_iter().map(ProductView::from).collect(),
    })
}

/// Product names for the search box autocomplete.
pub fn load_name_suggestions<R>(repo: &R, query: SuggestionQuery) -> ServiceResult<Vec<String>>
where
    R: CatalogStore + ?Sized,
{
    let catalog = CatalogService::new(repo);
    catalog.product_name_suggestions(query.term.as_deref().unwrap_or_default())
}
