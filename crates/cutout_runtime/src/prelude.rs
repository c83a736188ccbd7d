//! Prelude module for `cutout_runtime`.
//!
//! Brings the runtime types and the `cutout_types` prelude into scope.

#[doc(inline)]
pub use cutout_types::prelude::*;

// Runtime
#[doc(inline)]
pub use crate::clock::Clock;
#[doc(inline)]
pub use crate::error::MovieError;
#[doc(inline)]
pub use crate::event::{EventKind, EventSink, MovieEvent};
#[doc(inline)]
pub use crate::host::{Host, MovieId, NodeId, RecordingRenderer, RenderCall, Renderer, SlotRef, TickSource};
#[doc(inline)]
pub use crate::movie::{
	BuildOptions, DisplayKind, DisposeHandle, MovieInstance, PlayState, SlotSnapshot, SlotState,
};
#[doc(inline)]
pub use crate::registry::{MovieLookup, Registry};
