pub mod filters;
pub mod product;
