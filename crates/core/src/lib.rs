//! Ironyard Core - Shared types and the cart state container.
//!
//! This crate holds the parts of the storefront that carry no I/O. It is
//! shared by:
//! - `storefront` - JSON API for catalog browsing, cart and checkout
//! - `cli` - Command-line tools for migrations, seeding and order follow-up
//!
//! # Architecture
//!
//! The core crate contains only types, state transitions and traits - no
//! database access, no HTTP. Cart persistence is expressed through the
//! [`cart::CartStorage`] trait and implemented by the storefront.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails and product badges
//! - [`cart`] - Cart state, commands, snapshots and the persistence wrapper

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use types::*;
