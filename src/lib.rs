//! A REST catalog of food compositions.
//!
//! Exposes paged, sortable and searchable listing, single-item CRUD and a
//! random meal generator over one `compositions` table, with header-based
//! API versioning and OpenAPI docs served at `/docs`.

pub mod app;
pub mod config;
pub mod entity;
pub mod errors;
pub mod filter;
pub mod migration;
pub mod pagination;
pub mod query;
pub mod routes;
pub mod sort;
pub mod store;
pub mod telemetry;
pub mod validation;
pub mod versioning;

pub use entity::{Composition, CompositionCreate, CompositionUpdate, MealType};
pub use errors::{ApiError, StoreError};
pub use query::QueryParameters;
pub use store::{CompositionStore, SaveReport};
