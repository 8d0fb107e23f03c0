//! Database hooks for Quarry.
//!
//! A hook is the uniform "run a SQL statement" capability over one configured
//! connection. Tasks never own connections: they look a hook up by connection
//! ID in the [`ConnectionRegistry`] and submit their statement through it.
//!
//! This crate provides:
//! - The [`SqlHook`] trait
//! - [`PostgresHook`] (PostgreSQL and Redshift) and [`SqliteHook`], both backed by sqlx
//! - The [`ConnectionRegistry`] that maps connection IDs to hooks

mod error;
mod hook;
mod postgres;
mod registry;
mod sqlite;

pub use error::HookError;
pub use hook::SqlHook;
pub use postgres::PostgresHook;
pub use registry::{ConnectionRegistry, hook_for};
pub use sqlite::SqliteHook;
