use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, Product, UpdateProduct};

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: usize = 256;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Maximum allowed length of the raw comma separated tag list.
const TAGS_MAX_LEN_VALIDATOR: u64 = 512;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("product name cannot be empty")]
    EmptyName,
    /// The price is not a non-negative amount with at most two decimals.
    #[error("invalid price `{value}`")]
    InvalidPrice { value: String },
}

/// Form payload emitted by the product editor, used for both create and edit.
#[derive(Debug, Deserialize, Validate)]
pub struct ProductForm {
    /// Name entered by the user.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Price as typed, e.g. `1299.90`.
    pub price: String,
    /// Units in stock.
    #[validate(range(min = 0))]
    pub quantity: i32,
    /// Category the product is listed under.
    #[validate(range(min = 1))]
    pub category_id: i32,
    /// Comma separated tag names.
    #[validate(length(max = TAGS_MAX_LEN_VALIDATOR))]
    pub tags: Option<String>,
    /// Published checkbox.
    #[serde(default)]
    pub status: bool,
    /// Hot checkbox.
    #[serde(default)]
    pub hot_flag: bool,
}

impl ProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct`.
    pub fn into_new_product(self) -> ProductFormResult<NewProduct> {
        let fields = self.into_fields()?;

        let mut new_product = NewProduct::new(fields.name, fields.price_cents, fields.category_id)
            .with_quantity(fields.quantity);
        new_product.description = fields.description;
        new_product.status = fields.status;
        new_product.hot_flag = fields.hot_flag;
        new_product.tags = Some(fields.tags);

        Ok(new_product)
    }

    /// Validates and sanitizes the payload into a domain `UpdateProduct`.
    ///
    /// The submitted tag list always replaces the product's tags.
    pub fn into_update_product(
        self,
        current: &Product,
        updated_at: NaiveDateTime,
    ) -> ProductFormResult<UpdateProduct> {
        let fields = self.into_fields()?;

        let mut updates = UpdateProduct::from_product(current).tags(fields.tags);
        updates.name = fields.name;
        updates.description = fields.description;
        updates.price_cents = fields.price_cents;
        updates.quantity = fields.quantity;
        updates.category_id = fields.category_id;
        updates.status = fields.status;
        updates.hot_flag = fields.hot_flag;
        updates.updated_at = updated_at;

        Ok(updates)
    }

    fn into_fields(self) -> ProductFormResult<ProductFields> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let price_cents = parse_price_cents(&self.price)?;

        let description = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty());

        let tags = self
            .tags
            .as_deref()
            .map(sanitize_inline_text)
            .unwrap_or_default();

        Ok(ProductFields {
            name,
            description,
            price_cents,
            quantity: self.quantity,
            category_id: self.category_id,
            tags,
            status: self.status,
            hot_flag: self.hot_flag,
        })
    }
}

struct ProductFields {
    name: String,
    description: Option<String>,
    price_cents: i64,
    quantity: i32,
    category_id: i32,
    tags: String,
    status: bool,
    hot_flag: bool,
}

/// Form payload emitted when selling stock from the back office.
#[derive(Debug, Deserialize, Validate)]
pub struct SellProductForm {
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// Parse a decimal amount (`12`, `12.5`, `12,50`) into minor units.
pub fn parse_price_cents(input: &str) -> ProductFormResult<i64> {
    let invalid = || ProductFormError::InvalidPrice {
        value: input.trim().to_string(),
    };

    let normalized: String = input
        .trim()
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| if ch == ',' { '.' } else { ch })
        .collect();

    let (units, fraction) = match normalized.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (normalized.as_str(), ""),
    };

    if units.is_empty()
        || fraction.len() > 2
        || !units.chars().all(|ch| ch.is_ascii_digit())
        || !fraction.chars().all(|ch| ch.is_ascii_digit())
    {
        return Err(invalid());
    }

    let units = units.parse::<i64>().map_err(|_| invalid())?;
    let fraction = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse::<i64>().map_err(|_| invalid())?,
    };

    units
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(fraction))
        .ok_or_else(invalid)
}

fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

fn sanitize_multiline_text(input: &str) -> String {
    let mut lines: Vec<String> = input.lines().map(sanitize_inline_text).collect();

    while matches!(lines.first(), Some(line) if line.is_empty()) {
        lines.remove(0);
    }

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    let mut result = Vec::with_capacity(lines.len());
    let mut previous_empty = false;
    for line in lines {
        if line.is_empty() {
            if previous_empty {
                continue;
            }
            previous_empty = true;
            result.push(String::new());
        } else {
            previous_empty = false;
            result.push(line);
        }
    }

    result.join("\n")
}
