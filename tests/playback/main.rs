//! Playback tests for `cutout-rs`
//!
//! Drives movie instances built through the registry with a recording
//! renderer and checks the time mapping, frame crossing and caching
//! properties of the runtime.

mod common;
mod properties;
mod registry;
mod scenarios;
