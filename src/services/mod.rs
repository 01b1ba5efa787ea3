pub mod admin;
pub mod catalog;
pub mod errors;
pub mod storefront;

pub use errors::{ServiceError, ServiceResult};
