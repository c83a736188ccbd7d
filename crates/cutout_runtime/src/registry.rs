//! Group registry.
//!
//! A [`Registry`] maps group names to decoded packages and builds movie
//! instances from them. It is an ordinary value owned by the host; nothing in
//! the runtime keeps global registration state.

use std::sync::Arc;

use bytes::Bytes;
use cutout_types::package::{AtlasTexture, MovieDescriptor, Package, ParseConfig};

use crate::error::MovieError;
use crate::host::Host;
use crate::movie::{BuildOptions, MovieInstance};

/// Result of a movie lookup.
#[derive(Debug, Clone)]
pub struct MovieLookup {
	/// Name the group is registered under
	pub group_name: String,
	/// Package containing the movie
	pub package: Arc<Package>,
	/// Movie position in the package
	pub movie_index: usize,
}

impl MovieLookup {
	/// The movie descriptor.
	pub fn movie(&self) -> &MovieDescriptor {
		&self.package.movies()[self.movie_index]
	}
}

/// Named collection of decoded packages, in registration order.
#[derive(Debug, Default)]
pub struct Registry {
	groups: Vec<(String, Arc<Package>)>,
}

impl Registry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns `true` if a group is registered under `name`.
	pub fn has_group(&self, name: &str) -> bool {
		self.position(name).is_some()
	}

	/// Decodes a package and registers it.
	///
	/// The group is registered under `name`, or under the manifest name when
	/// `name` is `None`. Registering an existing name replaces that group.
	///
	/// # Errors
	///
	/// Returns [`MovieError::Format`] if decoding fails; the registry is left
	/// unchanged.
	pub fn add_group(
		&mut self,
		data: impl Into<Bytes>,
		textures: Vec<AtlasTexture>,
		name: Option<&str>,
	) -> Result<(), MovieError> {
		self.add_group_with_config(data, textures, name, &ParseConfig::default())
	}

	/// Same as [`Registry::add_group`] with a custom decode configuration.
	pub fn add_group_with_config(
		&mut self,
		data: impl Into<Bytes>,
		textures: Vec<AtlasTexture>,
		name: Option<&str>,
		config: &ParseConfig,
	) -> Result<(), MovieError> {
		let package = Package::from_bytes_with_config(data, config)?.with_textures(textures);
		let name = name.unwrap_or(package.name()).to_string();
		self.add_package(&name, Arc::new(package));
		Ok(())
	}

	/// Registers an already decoded package.
	pub fn add_package(&mut self, name: &str, package: Arc<Package>) {
		match self.position(name) {
			Some(index) => {
				log::warn!("Group '{name}' is already registered, replacing it");
				self.groups[index].1 = package;
			}
			None => {
				log::debug!("Registered group '{name}' ({} movies)", package.movies().len());
				self.groups.push((name.to_string(), package));
			}
		}
	}

	/// Unregisters a group. Unknown names are ignored.
	pub fn remove_group(&mut self, name: &str) -> Option<Arc<Package>> {
		let index = self.position(name)?;
		log::debug!("Removed group '{name}'");
		Some(self.groups.remove(index).1)
	}

	/// Unregisters every group.
	pub fn remove_all_groups(&mut self) {
		if !self.groups.is_empty() {
			log::debug!("Removed all {} groups", self.groups.len());
		}
		self.groups.clear();
	}

	/// Returns the package registered under `name`.
	pub fn group(&self, name: &str) -> Option<&Arc<Package>> {
		self.position(name).map(|index| &self.groups[index].1)
	}

	/// Registered group names in registration order.
	pub fn group_names(&self) -> Vec<String> {
		self.groups.iter().map(|(name, _)| name.clone()).collect()
	}

	/// Number of registered groups.
	pub fn len(&self) -> usize {
		self.groups.len()
	}

	/// Returns `true` when no group is registered.
	pub fn is_empty(&self) -> bool {
		self.groups.is_empty()
	}

	/// Finds a movie by name.
	///
	/// With `group`, only that group is searched. Otherwise groups are
	/// scanned in registration order and the first one containing the movie
	/// wins.
	pub fn find_movie(&self, movie: &str, group: Option<&str>) -> Option<MovieLookup> {
		let lookup = |(group_name, package): &(String, Arc<Package>)| {
			package.find_movie(movie).map(|movie_index| MovieLookup {
				group_name: group_name.clone(),
				package: Arc::clone(package),
				movie_index,
			})
		};

		match group {
			Some(group) => self.groups.iter().find(|(name, _)| name == group).and_then(lookup),
			None => self.groups.iter().find_map(lookup),
		}
	}

	/// Builds a self-driven movie instance.
	///
	/// # Errors
	///
	/// Returns [`MovieError::MovieNotFound`] if no group has the movie.
	pub fn build_movie(
		&self,
		movie: &str,
		group: Option<&str>,
		host: &mut Host<'_>,
	) -> Result<MovieInstance, MovieError> {
		self.build_movie_with(movie, group, &BuildOptions::default(), host)
	}

	/// Builds a movie instance with explicit options.
	///
	/// # Errors
	///
	/// Returns [`MovieError::MovieNotFound`] if no group has the movie.
	pub fn build_movie_with(
		&self,
		movie: &str,
		group: Option<&str>,
		options: &BuildOptions,
		host: &mut Host<'_>,
	) -> Result<MovieInstance, MovieError> {
		let Some(lookup) = self.find_movie(movie, group) else {
			log::warn!("No movie '{movie}' in {}", group.unwrap_or("any group"));
			return Err(MovieError::movie_not_found(movie, group));
		};
		MovieInstance::new(lookup.package, &lookup.group_name, lookup.movie_index, options, host)
	}

	/// Names of all movies in a group.
	///
	/// # Errors
	///
	/// Returns [`MovieError::GroupNotFound`] if the group is not registered.
	pub fn movie_names(&self, group: &str) -> Result<Vec<String>, MovieError> {
		match self.group(group) {
			Some(package) => Ok(package.movie_names()),
			None => {
				log::warn!("No group '{group}'");
				Err(MovieError::GroupNotFound(group.to_string()))
			}
		}
	}

	fn position(&self, name: &str) -> Option<usize> {
		self.groups.iter().position(|(group, _)| group == name)
	}
}
