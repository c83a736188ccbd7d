//! Prelude module for `cutout_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use cutout_internal::prelude::*;
//!
//! let registry = Registry::new();
//! let builder = PackageBuilder::new("demo");
//! let options = BuildOptions::nested();
//! assert!(registry.is_empty());
//! assert!(!options.self_driven);
//! ```

// Re-export everything from cutout_runtime::prelude (which includes cutout_types::prelude)
#[doc(inline)]
pub use cutout_runtime::prelude::*;

// Re-export the member crates for advanced usage
#[doc(inline)]
pub use cutout_runtime;
#[doc(inline)]
pub use cutout_types;
