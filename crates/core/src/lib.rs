//! Core business logic for Platter.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `order` - Order placement and the kitchen status workflow
//! - `split` - Bill splitting among participants, tip allocation, split book

pub mod order;
pub mod split;
