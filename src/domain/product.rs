use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Domain representation of a catalog product.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Optional longer description shown to customers.
    pub description: Option<String>,
    /// Price represented in the smallest currency unit (for example cents).
    pub price_cents: i64,
    /// Units in stock; never negative.
    pub quantity: i32,
    /// Identifier of the category the product is listed under.
    pub category_id: i32,
    /// Whether the product is published on the storefront.
    pub status: bool,
    /// Whether the product is featured in the "hot" block.
    pub hot_flag: bool,
    /// Number of times the product page has been viewed.
    pub view_count: i32,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub quantity: i32,
    pub category_id: i32,
    pub status: bool,
    pub hot_flag: bool,
    pub view_count: i32,
    pub created_at: NaiveDateTime,
    /// Comma separated tag names; only used to derive tag associations.
    pub tags: Option<String>,
}

impl NewProduct {
    /// Build an unpublished product payload stamped with the current time.
    pub fn new(name: impl Into<String>, price_cents: i64, category_id: i32) -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            name: name.into(),
            description: None,
            price_cents,
            quantity: 0,
            category_id,
            status: false,
            hot_flag: false,
            view_count: 0,
            created_at: now,
            tags: None,
        }
    }

    /// Attach a descriptive text to the product payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the initial stock.
    pub fn with_quantity(mut self, quantity: i32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Publish the product on the storefront.
    pub fn published(mut self) -> Self {
        self.status = true;
        self
    }

    /// Feature the product in the hot block.
    pub fn hot(mut self) -> Self {
        self.hot_flag = true;
        self
    }

    /// Seed the view counter, e.g. when importing existing data.
    pub fn with_view_count(mut self, view_count: i32) -> Self {
        self.view_count = view_count;
        self
    }

    /// Override the creation timestamp.
    pub fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    /// Attach a comma separated tag list.
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }
}

/// Full replacement of the editable product fields.
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub quantity: i32,
    pub category_id: i32,
    pub status: bool,
    pub hot_flag: bool,
    /// Comma separated tag names. `None` keeps the current associations,
    /// `Some("")` removes all of them.
    pub tags: Option<String>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl UpdateProduct {
    /// Start an update from the current state of `product`.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price_cents: product.price_cents,
            quantity: product.quantity,
            category_id: product.category_id,
            status: product.status,
            hot_flag: product.hot_flag,
            tags: None,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    /// Replace the tag list.
    pub fn tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }
}

/// Ordering applied to paginated product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductSort {
    /// Most viewed first.
    Popular,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
    /// Most recently created first.
    #[default]
    Newest,
}

impl ProductSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductSort::Popular => "popular",
            ProductSort::PriceAsc => "price_asc",
            ProductSort::PriceDesc => "price_desc",
            ProductSort::Newest => "new",
        }
    }
}

impl From<&str> for ProductSort {
    /// Unknown values fall back to newest-first.
    fn from(value: &str) -> Self {
        match value.trim() {
            "popular" => ProductSort::Popular,
            "price_asc" => ProductSort::PriceAsc,
            "price_desc" => ProductSort::PriceDesc,
            _ => ProductSort::Newest,
        }
    }
}

impl From<String> for ProductSort {
    fn from(value: String) -> Self {
        ProductSort::from(value.as_str())
    }
}

impl From<ProductSort> for String {
    fn from(value: ProductSort) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ProductSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query definition used to filter, order and page products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Substring matched against the name or the description.
    pub search: Option<String>,
    /// Substring matched against the name only.
    pub name_contains: Option<String>,
    /// Restrict to one category.
    pub category_id: Option<i32>,
    /// Restrict to products carrying this tag.
    pub tag_id: Option<i32>,
    /// Leave this product out of the results.
    pub exclude_id: Option<i32>,
    /// Only published products.
    pub published_only: bool,
    /// Only products flagged as hot.
    pub hot_only: bool,
    /// Ordering of the results.
    pub sort: ProductSort,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
    /// Optional cap on the number of rows, used for top-N blocks.
    pub limit: Option<usize>,
}

impl ProductListQuery {
    /// Construct a query matching every product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by a term contained in the name or description.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Filter by a term contained in the name.
    pub fn name_contains(mut self, term: impl Into<String>) -> Self {
        self.name_contains = Some(term.into());
        self
    }

    pub fn category(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn tag(mut self, tag_id: i32) -> Self {
        self.tag_id = Some(tag_id);
        self
    }

    pub fn exclude(mut self, product_id: i32) -> Self {
        self.exclude_id = Some(product_id);
        self
    }

    /// Only return products visible on the storefront.
    pub fn published(mut self) -> Self {
        self.published_only = true;
        self
    }

    pub fn hot(mut self) -> Self {
        self.hot_only = true;
        self
    }

    pub fn sort(mut self, sort: ProductSort) -> Self {
        self.sort = sort;
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }

    /// Return at most `limit` rows.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_parses_known_values() {
        assert_eq!(ProductSort::from("popular"), ProductSort::Popular);
        assert_eq!(ProductSort::from("price_asc"), ProductSort::PriceAsc);
        assert_eq!(ProductSort::from("price_desc"), ProductSort::PriceDesc);
    }

    #[test]
    fn unknown_sort_defaults_to_newest() {
        assert_eq!(ProductSort::from(""), ProductSort::Newest);
        assert_eq!(ProductSort::from("cheapest"), ProductSort::Newest);
        assert_eq!(ProductSort::from("PRICE_ASC"), ProductSort::Newest);
    }

    #[test]
    fn sort_deserializes_from_query_value() {
        let sort: ProductSort = serde_json::from_str("\"price_desc\"").expect("valid json");
        assert_eq!(sort, ProductSort::PriceDesc);

        let sort: ProductSort = serde_json::from_str("\"whatever\"").expect("valid json");
        assert_eq!(sort, ProductSort::Newest);
    }

    #[test]
    fn list_query_builder_sets_filters() {
        let query = ProductListQuery::new()
            .published()
            .category(3)
            .exclude(9)
            .sort(ProductSort::Popular)
            .paginate(2, 10);

        assert!(query.published_only);
        assert_eq!(query.category_id, Some(3));
        assert_eq!(query.exclude_id, Some(9));
        assert_eq!(query.sort, ProductSort::Popular);
        assert_eq!(
            query.pagination,
            Some(Pagination {
                page: 2,
                per_page: 10
            })
        );
    }
}
