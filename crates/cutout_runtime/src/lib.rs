//! Playback runtime for cutout animation packages.
//!
//! # Contents
//!
//! - **Registry**: Named groups of decoded packages and movie construction
//! - **Movie**: Movie instances, the playback state machine, slot resolution
//!   and timeline actions
//! - **Host**: Renderer, event sink and tick source capabilities the runtime
//!   calls into
//! - **Clock**: A minimal tick source for hosts without a scheduler
//!
//! # Examples
//!
//! ```no_run
//! use cutout_runtime::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = Registry::new();
//! registry.add_group(std::fs::read("hero.dbmv")?, vec![AtlasTexture::new("hero", 512.0, 512.0)], None)?;
//!
//! let mut renderer = RecordingRenderer::new();
//! let mut events: Vec<MovieEvent> = Vec::new();
//! let mut host = Host::new(&mut renderer, &mut events, &());
//!
//! let mut hero = registry.build_movie("hero", None, &mut host)?;
//! hero.play(Some("walk"), Some(0))?;
//! hero.advance_time(1.0 / 30.0, &mut host);
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod error;
pub mod event;
pub mod host;
pub mod movie;
pub mod registry;

/// `use cutout_runtime::prelude::*;` to import commonly used items.
pub mod prelude;

pub use error::MovieError;
pub use movie::MovieInstance;
pub use registry::Registry;
