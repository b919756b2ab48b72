//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`CredentialHasher`],
//! [`ClaimTokenGenerator`]) are implemented by outbound adapters. Driving
//! ports ([`ClaimCommand`], [`AccountCommand`] and friends) are what inbound
//! adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod alumni_repository;
mod claim_command;
mod claim_query;
mod claim_token_generator;
mod claim_token_repository;
mod credential_hasher;
mod directory_query;
mod event_repository;
mod hotel_repository;
mod memory_repository;
mod reunion_catalogue;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::AccountCommand;
#[cfg(test)]
pub use alumni_repository::MockAlumniRepository;
pub use alumni_repository::{AlumniRepository, AlumniRepositoryError};
#[cfg(test)]
pub use claim_command::MockClaimCommand;
pub use claim_command::{ClaimCommand, DirectClaim, DirectClaimOutcome};
#[cfg(test)]
pub use claim_query::MockClaimQuery;
pub use claim_query::{ClaimLinkStatus, ClaimPreview, ClaimQuery};
#[cfg(test)]
pub use claim_token_generator::MockClaimTokenGenerator;
pub use claim_token_generator::ClaimTokenGenerator;
#[cfg(test)]
pub use claim_token_repository::MockClaimTokenRepository;
pub use claim_token_repository::{ClaimTokenRepository, ClaimTokenRepositoryError, TokenRedemption};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHashError, CredentialHasher};
#[cfg(test)]
pub use directory_query::MockDirectoryQuery;
pub use directory_query::DirectoryQuery;
#[cfg(test)]
pub use event_repository::MockEventRepository;
pub use event_repository::{EventRepository, EventRepositoryError};
#[cfg(test)]
pub use hotel_repository::MockHotelRepository;
pub use hotel_repository::{HotelRepository, HotelRepositoryError};
#[cfg(test)]
pub use memory_repository::MockMemoryRepository;
pub use memory_repository::{MemoryRepository, MemoryRepositoryError};
#[cfg(test)]
pub use reunion_catalogue::{MockEventCalendar, MockHotelCatalogue, MockMemoryWall};
pub use reunion_catalogue::{EventCalendar, HotelCatalogue, MemoryWall};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
