//! Storage backends for hireboard.
//!
//! Both backends implement every collaborator trait the pipeline board
//! needs, so either can be handed to
//! [`Collaborators::from_backend`](hireboard_pipeline::Collaborators::from_backend).
//!
//! - [`JsonStore`]: one directory per job with JSON files for applications,
//!   stages and recruiter claims
//! - [`MemoryStore`]: an in-process store seeded with demo data, with
//!   switchable failures and latency for exercising rollbacks
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use hireboard_pipeline::Collaborators;
//! use hireboard_protocol::RecruiterId;
//! use hireboard_store::MemoryStore;
//!
//! let store = Arc::new(MemoryStore::demo(&RecruiterId::new("grace")));
//! let collaborators = Collaborators::from_backend(store);
//! # let _ = collaborators;
//! ```

pub mod error;
pub mod file;
pub mod memory;

pub use error::{Result, StoreError};
pub use file::JsonStore;
pub use memory::MemoryStore;
