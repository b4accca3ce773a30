//! pw-db: database access and persistence layer.
//!
//! This crate provides SQLite-backed storage with connection pooling,
//! embedded migrations, row mapping, and the photo queries. Handlers use it
//! through the [`repo::PhotoRepository`] trait.
//!
//! # Example
//!
//! ```
//! use pw_db::pool::init_memory_pool;
//! use pw_db::repo::{PhotoRepository, SqlitePhotoRepository};
//!
//! let repo = SqlitePhotoRepository::new(init_memory_pool().unwrap());
//! let photo = repo.insert("a.jpg").unwrap();
//! assert_eq!(photo.url, "/images/a.jpg");
//! assert_eq!(repo.list_ordered().unwrap().len(), 1);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod repo;
