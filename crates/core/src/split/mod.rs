//! Bill splitting.
//!
//! This module implements the proportional bill split allocator:
//! - Request and result types
//! - Validation pre-pass
//! - Unit allocation with over-claim scaling and a fallback owner
//! - Share, tip and total computation
//! - The split book holding the current split per order

pub mod allocation;
pub mod book;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod props;

pub use allocation::{ClaimAllocator, ParticipantUnits};
pub use book::{SplitBook, SplitRecord};
pub use error::SplitError;
pub use service::SplitService;
pub use types::{
    AllocatedItem, ItemClaim, ParticipantInput, ParticipantShare, SplitRequest, SplitResult,
};
pub use validation::{ResolvedClaim, validate_request};
