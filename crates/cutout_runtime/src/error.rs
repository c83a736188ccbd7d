//! Error types for the runtime.

use cutout_types::package::FormatError;
use thiserror::Error;

/// Errors returned by the registry and by movie control operations.
///
/// Nothing in this enum is ever raised from inside a tick: playback problems
/// degrade to no-ops and are only logged.
#[derive(Debug, Error)]
pub enum MovieError {
	/// No group registered under this name
	#[error("Group not found: {0}")]
	GroupNotFound(String),

	/// No movie with this name in the searched groups
	#[error("Movie '{movie}' not found{}", in_group(.group))]
	MovieNotFound {
		/// Requested movie name
		movie: String,
		/// Group searched, `None` when all groups were searched
		group: Option<String>,
	},

	/// No clip with this name in the movie
	#[error("Clip '{clip}' not found in movie '{movie}'")]
	ClipNotFound {
		/// Movie name
		movie: String,
		/// Requested clip name
		clip: String,
	},

	/// The instance was disposed
	#[error("Movie instance has been disposed")]
	Disposed,

	/// Package decoding failed
	#[error(transparent)]
	Format(#[from] FormatError),
}

fn in_group(group: &Option<String>) -> String {
	group.as_ref().map(|group| format!(" in group '{group}'")).unwrap_or_default()
}

impl MovieError {
	/// Creates a [`MovieError::MovieNotFound`] error.
	pub fn movie_not_found(movie: &str, group: Option<&str>) -> Self {
		Self::MovieNotFound {
			movie: movie.to_string(),
			group: group.map(str::to_string),
		}
	}

	/// Creates a [`MovieError::ClipNotFound`] error.
	pub fn clip_not_found(movie: &str, clip: &str) -> Self {
		Self::ClipNotFound {
			movie: movie.to_string(),
			clip: clip.to_string(),
		}
	}
}
