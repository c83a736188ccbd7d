//! Simple tick source for hosts without their own scheduler.

use std::cell::{Cell, RefCell};

use crate::event::EventSink;
use crate::host::{Host, MovieId, Renderer, TickSource};
use crate::movie::MovieInstance;

/// Tick source that keeps a list of self-driven instances.
///
/// Instances register on construction and unregister on disposal. The clock
/// does not own them; [`Clock::tick`] advances the registered ones among the
/// instances the host passes in.
///
/// # Examples
///
/// ```no_run
/// use cutout_runtime::prelude::*;
///
/// # fn run(registry: &Registry) -> Result<(), MovieError> {
/// let clock = Clock::new();
/// let mut renderer = RecordingRenderer::new();
/// let mut events = Vec::new();
///
/// let mut movies = vec![{
///     let mut host = Host::new(&mut renderer, &mut events, &clock);
///     registry.build_movie("hero", None, &mut host)?
/// }];
/// movies[0].play(Some("walk"), None)?;
/// clock.tick(1.0 / 60.0, &mut movies, &mut renderer, &mut events);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Clock {
	registered: RefCell<Vec<MovieId>>,
	time: Cell<f64>,
}

impl Clock {
	/// Creates a clock at time zero.
	pub fn new() -> Self {
		Self::default()
	}

	/// Total time ticked so far.
	pub fn time(&self) -> f64 {
		self.time.get()
	}

	/// Returns `true` if `movie` is registered.
	pub fn is_registered(&self, movie: MovieId) -> bool {
		self.registered.borrow().contains(&movie)
	}

	/// Registered instances in registration order.
	pub fn registered(&self) -> Vec<MovieId> {
		self.registered.borrow().clone()
	}

	/// Advances every registered instance in `movies` by `delta` seconds.
	pub fn tick(
		&self,
		delta: f64,
		movies: &mut [MovieInstance],
		renderer: &mut dyn Renderer,
		events: &mut dyn EventSink,
	) {
		self.time.set(self.time.get() + delta);
		for movie in movies.iter_mut() {
			if !self.is_registered(movie.id()) {
				continue;
			}
			let mut host = Host::new(&mut *renderer, &mut *events, self);
			movie.advance_time(delta, &mut host);
		}
	}
}

impl TickSource for Clock {
	fn register(&self, movie: MovieId) {
		let mut registered = self.registered.borrow_mut();
		if !registered.contains(&movie) {
			log::trace!("Clock: register movie {movie}");
			registered.push(movie);
		}
	}

	fn unregister(&self, movie: MovieId) {
		log::trace!("Clock: unregister movie {movie}");
		self.registered.borrow_mut().retain(|id| *id != movie);
	}
}
