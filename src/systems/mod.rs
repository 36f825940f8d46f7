//! CRISPR system catalog and PAM matching.
//!
//! Each system defines the PAM motif that must follow a protospacer and the
//! guide length. An embedded catalog is compiled into the binary (validated by
//! `build.rs`), and custom catalogs can be loaded from JSON files.
//!
//! ## Embedded Catalog
//!
//! | System | PAM  | Guide length |
//! |--------|------|--------------|
//! | SpCas9 | NGG  | 20           |
//! | Cas12a | TTTV | 23           |
//!
//! ## Example
//!
//! ```rust
//! use crispr_guide::systems::store::SystemCatalog;
//!
//! let catalog = SystemCatalog::load_embedded().unwrap();
//! let spcas9 = catalog.get("SpCas9").unwrap();
//! let pam = spcas9.pam_pattern().unwrap();
//! assert!(pam.matches(b"TGG"));
//! ```

pub mod pam;
pub mod store;
