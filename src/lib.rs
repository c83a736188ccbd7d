#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `cutout-rs` plays cached cutout animations ("movies") exported as binary
//! packages: a JSON manifest plus packed pose arrays, sampled per cache frame
//! and pushed to a host renderer.
//!
pub use cutout_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use cutout_dylib;
