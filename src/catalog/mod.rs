//! Product catalog persistence (SQLite through SeaORM).
pub mod connection;
pub mod dao;
pub mod entities;
pub mod error;
pub mod migration;
pub mod seed;

pub use dao::{ProductDAO, icontains};
pub use entities::product::Model as Product;
pub use error::CatalogError;

#[cfg(test)]
pub mod test_support;
