use std::env;
use std::str::FromStr;

use crate::pagination::DEFAULT_ITEMS_PER_PAGE;

/// Settings shared by the storefront handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Products per listing page.
    pub page_size: usize,
    /// Products in the "new arrivals" block on the home page.
    pub new_arrivals_count: usize,
    /// Products in the "hot" block on the home page.
    pub hot_products_count: usize,
    /// Related products shown on a product page.
    pub related_products_count: usize,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_ITEMS_PER_PAGE,
            new_arrivals_count: 8,
            hot_products_count: 4,
            related_products_count: 4,
        }
    }
}

/// Process configuration read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Key used to sign flash-message cookies; a random key is used when absent.
    pub secret: Option<String>,
    pub storefront: StorefrontConfig,
}

impl ServerConfig {
    /// Read the configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = StorefrontConfig::default();

        let storefront = StorefrontConfig {
            page_size: parse_or(&lookup, "PAGE_SIZE", defaults.page_size),
            new_arrivals_count: parse_or(
                &lookup,
                "NEW_ARRIVALS_COUNT",
                defaults.new_arrivals_count,
            ),
            hot_products_count: parse_or(
                &lookup,
                "HOT_PRODUCTS_COUNT",
                defaults.hot_products_count,
            ),
            related_products_count: parse_or(
                &lookup,
                "RELATED_PRODUCTS_COUNT",
                defaults.related_products_count,
            ),
        };

        Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "app.db".to_string()),
            address: lookup("ADDRESS").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8080),
            secret: lookup("SECRET_KEY").filter(|value| !value.is_empty()),
            storefront,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Ignoring invalid value `{raw}` for {key}");
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| values.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = config_from(&[]);

        assert_eq!(config.database_url, "app.db");
        assert_eq!(config.address, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.secret.is_none());
        assert_eq!(config.storefront, StorefrontConfig::default());
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = config_from(&[
            ("DATABASE_URL", "shop.db"),
            ("PORT", "9000"),
            ("SECRET_KEY", "s3cret"),
            ("PAGE_SIZE", "24"),
            ("RELATED_PRODUCTS_COUNT", "6"),
        ]);

        assert_eq!(config.database_url, "shop.db");
        assert_eq!(config.port, 9000);
        assert_eq!(config.secret.as_deref(), Some("s3cret"));
        assert_eq!(config.storefront.page_size, 24);
        assert_eq!(config.storefront.related_products_count, 6);
        assert_eq!(config.storefront.hot_products_count, 4);
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let config = config_from(&[("PORT", "eighty"), ("PAGE_SIZE", "-3")]);

        assert_eq!(config.port, 8080);
        assert_eq!(config.storefront.page_size, DEFAULT_ITEMS_PER_PAGE);
    }
}
