//! This crate provides the data model and package decoder for the `cutout-rs` project.
//!
//! # Contents
//!
//! - **Package**: Binary animation package ("group") with a JSON manifest and
//!   packed pose arrays, decoded into zero-copy typed views
//! - **Manifest**: Serde descriptors for movies, slots, clips, displays and frames
//! - **Geometry**: Rectangles, affine transforms and color transforms
//! - **Builder**: Writer for the package layout, used by tooling and tests
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use cutout_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let package = Package::open("hero.dbmv")?;
//! println!("{package}");
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use cutout_types::package::{Package, ParseConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("hero.dbmv")?;
//! let package = Package::from_bytes_with_config(data, &ParseConfig::strict())?;
//! # Ok(())
//! # }
//! ```

pub mod geom;
pub mod package;

/// `use cutout_types::prelude::*;` to import commonly used items.
pub mod prelude;
