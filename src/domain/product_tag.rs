use chrono::NaiveDateTime;

/// Association to insert between a product and an existing tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProductTag {
    pub product_id: i32,
    pub tag_id: i32,
    pub linked_at: NaiveDateTime,
}

impl NewProductTag {
    /// Link `tag_id` to `product_id`, stamped with the current time.
    pub fn new(product_id: i32, tag_id: i32) -> Self {
        Self {
            product_id,
            tag_id,
            linked_at: chrono::Local::now().naive_utc(),
        }
    }
}

/// A write staged by the catalog service and applied on commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingChange {
    /// Make the product's tag associations exactly `tag_ids`.
    ReplaceProductTags { product_id: i32, tag_ids: Vec<i32> },
    /// Set the stock to `quantity`, provided it still equals `expected`.
    SetStock {
        product_id: i32,
        expected: i32,
        quantity: i32,
    },
}
