//! Fluent configuration API.
//!
//! # Example
//!
//! ```ignore
//! use pdfscribe_core::api::{DocumentBuilder, EncryptionBuilder};
//! use pdfscribe_core::security::{EncryptMode, Permissions};
//!
//! let mut doc = DocumentBuilder::new()
//!     .encryption(
//!         EncryptionBuilder::new()
//!             .user_password("user")
//!             .owner_password("owner")
//!             .mode(EncryptMode::R4)
//!             .permissions(Permissions::PRINT),
//!     )
//!     .build()?;
//! ```

pub mod builder;

pub use builder::{DocumentBuilder, EncryptionBuilder};
