//! Laboratory catalogue documents for seeding a labrank deployment.
//!
//! A catalogue document is a small versioned JSON file listing the labs
//! students may rank. Each deployment ships exactly one catalogue; the
//! backend inserts it into an empty `labs` table on first start.
//!
//! The crate only parses and validates documents; callers read the file.
//! It knows nothing about the database or the backend domain types.
//!
//! # Example
//!
//! ```
//! use lab_catalogue::CatalogueDocument;
//!
//! let json = r#"{
//!     "version": 1,
//!     "labs": [
//!         {"name": "Metadata Lab", "staff": "M. Nagamori", "capacity": 3},
//!         {"name": "Frog Lab"}
//!     ]
//! }"#;
//!
//! let catalogue = CatalogueDocument::from_json(json).expect("valid catalogue");
//! assert_eq!(catalogue.labs().len(), 2);
//! assert_eq!(catalogue.labs()[1].capacity(), None);
//! ```

mod document;
mod error;

pub use document::{BUNDLED_CATALOGUE, CatalogueDocument, LabSeed};
pub use error::CatalogueError;
