//! Domains module containing business logic organized by bounded contexts.
//!
//! Only tools are exposed by this server.

pub mod tools;
