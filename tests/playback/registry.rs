//! Group registration and movie construction

use std::sync::Arc;

use cutout_rs::prelude::*;

use crate::common::{Harness, atlas, walker_bytes, walker_registry};

#[test]
fn add_group_uses_manifest_name() {
	let registry = walker_registry();
	assert!(registry.has_group("walkers"));
	assert!(!registry.has_group("runners"));
	assert_eq!(registry.len(), 1);
	assert_eq!(registry.movie_names("walkers").unwrap(), vec!["walker".to_string()]);
}

#[test_log::test]
fn add_group_replaces_existing_name() {
	let mut registry = walker_registry();
	let before = Arc::clone(registry.group("walkers").unwrap());

	registry.add_group(walker_bytes("other"), atlas(), Some("walkers")).unwrap();
	assert_eq!(registry.len(), 1);
	let after = registry.group("walkers").unwrap();
	assert!(!Arc::ptr_eq(&before, after));
	assert_eq!(after.name(), "other");
}

#[test]
fn add_group_rejects_malformed_data() {
	let mut registry = walker_registry();
	let mut data = walker_bytes("broken");
	data.truncate(data.len() / 2);

	let error = registry.add_group(data, atlas(), None).unwrap_err();
	assert!(matches!(error, MovieError::Format(_)));
	assert_eq!(registry.group_names(), vec!["walkers".to_string()]);
}

#[test]
fn remove_groups() {
	let mut registry = walker_registry();
	registry.add_group(walker_bytes("runners"), atlas(), None).unwrap();
	assert_eq!(registry.group_names(), vec!["walkers".to_string(), "runners".to_string()]);

	assert!(registry.remove_group("walkers").is_some());
	assert!(registry.remove_group("walkers").is_none());
	assert_eq!(registry.group_names(), vec!["runners".to_string()]);

	registry.remove_all_groups();
	assert!(registry.is_empty());
}

#[test_log::test]
fn lookups_report_not_found() {
	let registry = walker_registry();
	let mut harness = Harness::default();

	let error = registry.movie_names("runners").unwrap_err();
	assert!(matches!(error, MovieError::GroupNotFound(ref group) if group == "runners"));

	let error = registry.build_movie("runner", None, &mut harness.host()).unwrap_err();
	assert!(matches!(error, MovieError::MovieNotFound { group: None, .. }));
	assert_eq!(error.to_string(), "Movie 'runner' not found");

	let error = registry.build_movie("walker", Some("runners"), &mut harness.host()).unwrap_err();
	assert_eq!(error.to_string(), "Movie 'walker' not found in group 'runners'");
	assert!(harness.renderer.calls.is_empty());
}

#[test]
fn build_movie_registers_with_ticker() {
	let registry = walker_registry();
	let clock = Clock::new();
	let mut renderer = RecordingRenderer::new();
	let mut events: Vec<MovieEvent> = Vec::new();

	let mut movies = vec![{
		let mut host = Host::new(&mut renderer, &mut events, &clock);
		registry.build_movie("walker", None, &mut host).unwrap()
	}];
	assert!(movies[0].is_self_driven());
	assert_eq!(clock.registered(), vec![movies[0].id()]);
	assert_eq!(movies[0].group_name(), "walkers");
	assert_eq!(movies[0].clip_name(), Some("walk"));

	movies[0].play(None, None).unwrap();
	for _ in 0..6 {
		clock.tick(0.05, &mut movies, &mut renderer, &mut events);
	}
	assert!((movies[0].current_time() - 0.3).abs() < 1e-9);
	assert_eq!(events.first().map(|event| event.kind), Some(EventKind::Start));
}
