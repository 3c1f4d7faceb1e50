//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories and migrations using Diesel
//! - **crypto**: PBKDF2 password hashing
//!
//! Adapters only translate between domain types and infrastructure
//! representations.

pub mod crypto;
pub mod persistence;
