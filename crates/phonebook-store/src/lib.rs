//! phonebook-store — key-value store layer for the phonebook service.
//!
//! Provides the [`KeyValueStore`] seam, a Redis-backed implementation
//! ([`RedisStore`]), an in-memory one ([`MemoryStore`]) for tests and local
//! runs, and the [`PhoneRepository`] that maps phone/address operations onto
//! conditional store commands.
//!
//! # Layout
//!
//! Phones are stored under their own string as the key and the address as
//! the plain string value. Existence of the key is the only record of a
//! phone being registered.
//!
//! Every store handle is `Clone` + `Send` + `Sync` and is meant to be created
//! once per process and shared across request tasks.

pub mod config;
pub mod error;
pub mod kv;
pub mod memory;
pub mod redis_store;
pub mod repository;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use repository::PhoneRepository;
