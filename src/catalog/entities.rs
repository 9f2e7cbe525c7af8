//! Module to export all database entities.
pub mod product;

pub use product::Entity as ProductEntity;
