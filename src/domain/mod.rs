pub mod alias;
pub mod product;
pub mod product_tag;
pub mod tag;
