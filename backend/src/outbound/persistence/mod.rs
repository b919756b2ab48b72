//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module.
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/reunion")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_alumni_repository;
mod diesel_claim_token_repository;
mod diesel_error_mapping;
mod diesel_reunion_repositories;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod row_mapping;
mod schema;

pub use diesel_alumni_repository::DieselAlumniRepository;
pub use diesel_claim_token_repository::DieselClaimTokenRepository;
pub use diesel_reunion_repositories::{
    DieselEventRepository, DieselHotelRepository, DieselMemoryRepository,
};
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
