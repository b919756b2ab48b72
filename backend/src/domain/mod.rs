//! Domain primitives, services and ports.
//!
//! Purpose: hold the reunion business rules (profile claims, account linking
//! and role transitions) independent of HTTP and storage. Inbound adapters
//! call the driving ports in [`ports`]; outbound adapters implement the
//! driven ones.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failures.
//! - User, AlumniProfile, ClaimToken and friends: validated aggregates.
//! - ClaimService, AccountService, DirectoryService, HotelService,
//!   EventService, MemoryService: driving port implementations.
//! - IdentityResolver and RoleGate: the claim workflow's building blocks.

pub mod account_service;
pub mod alumni;
pub mod auth;
pub mod claim_service;
pub mod claim_token;
pub mod directory_service;
pub mod error;
pub mod event;
pub mod event_service;
pub mod hotel;
pub mod hotel_service;
pub mod identity_resolver;
pub mod memory;
pub mod memory_service;
mod port_errors;
pub mod ports;
pub mod role_gate;
pub mod trace_id;
pub mod user;

pub use self::account_service::{AccountPorts, AccountService};
pub use self::alumni::{
    AlumniId, AlumniProfile, Attendance, DirectoryEntry, ProfileUpdate, ProfileValidationError,
    RosterEntry, UnclaimedProfile,
};
pub use self::auth::{
    ExternalIdentity, LoginCredentials, LoginValidationError, PASSWORD_MIN, Registration,
    RegistrationValidationError,
};
pub use self::claim_service::{ClaimPorts, ClaimService, ClaimSettings};
pub use self::claim_token::{
    ClaimToken, ClaimTokenHash, ClaimTokenValidationError, ClaimTokenValue, IssuedClaimToken,
    TokenStatus,
};
pub use self::directory_service::DirectoryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::event::{Event, EventDraft, EventId, EventSummary, EventValidationError};
pub use self::event_service::EventService;
pub use self::hotel::{Hotel, HotelDraft, HotelId, HotelValidationError, HotelWithGuests};
pub use self::hotel_service::HotelService;
pub use self::identity_resolver::{
    IdentityQuery, IdentityResolver, MatchKind, NameMatchPolicy, ResolvedIdentity,
};
pub use self::memory::{Memory, MemoryDraft, MemoryId, MemoryValidationError};
pub use self::memory_service::MemoryService;
pub(crate) use self::port_errors::{
    map_alumni_error, map_claim_token_error, map_event_error, map_hash_error, map_hotel_error,
    map_memory_error, map_user_error, token_rejected,
};
pub use self::role_gate::{RoleGate, SessionClaims};
pub use self::trace_id::TraceId;
pub use self::user::{EmailAddress, PasswordHash, Role, User, UserId, UserValidationError};
