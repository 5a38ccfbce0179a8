//! Outbound adapters implementing the domain's repository ports.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM.
//! - **memory**: a process-local store for tests and database-less runs.
//!
//! Adapters are thin translators between domain types and storage
//! representations. They contain no scheduling rules.

pub mod memory;
pub mod persistence;
