//! End-to-end playback scenarios

use cutout_rs::prelude::*;

use crate::common::{Harness, atlas, walker_bytes, walker_registry};

/// One movie with a single one-second clip played once and no timeline.
fn solo_registry() -> Registry {
	let mut builder = PackageBuilder::new("solo");
	let region = builder.add_rectangle(Rectangle::new(0.0, 0.0, 16.0, 16.0));
	let display = builder.add_display(DisplayDescriptor::image("dot", region)) as i16;
	let display_frame = builder.add_display_frame(display, -1);
	let transform = builder.add_transform(Transform::IDENTITY);

	let mut movie = MovieDescriptor::new("solo", 24.0);
	movie.slot.push(SlotDescriptor::new("dot"));
	let movie = builder.add_movie(movie);
	builder.add_clip(movie, "once", 1, 1.0, 1.0, &[[display_frame, transform]]);

	let mut registry = Registry::new();
	registry.add_group(builder.to_bytes().unwrap(), atlas(), None).unwrap();
	registry
}

#[test]
fn single_play_reaches_the_end() {
	let registry = solo_registry();
	let mut harness = Harness::default();
	let mut movie = harness.build(&registry, "solo");
	movie.play(Some("once"), None).unwrap();

	movie.advance_time(0.5, &mut harness.host());
	assert_eq!(movie.current_time(), 0.5);
	assert!(!movie.is_complete());

	movie.advance_time(0.6, &mut harness.host());
	assert_eq!(movie.current_time(), 1.0);
	assert!(movie.is_complete());
	assert!(!movie.is_playing());
	assert_eq!(movie.cache_frame_index(), Some(0));
}

#[test]
fn play_after_stop_restarts_clip() {
	let registry = walker_registry();
	let mut harness = Harness::default();
	let mut movie = harness.build(&registry, "walker");

	movie.play(Some("walk"), Some(3)).unwrap();
	movie.advance_time(1.4, &mut harness.host());
	assert_eq!(movie.current_play_times(), 1);
	movie.stop();
	assert!(!movie.is_playing());

	movie.play(None, None).unwrap();
	assert_eq!(movie.clip_name(), Some("walk"));
	assert_eq!(movie.current_time(), 0.0);
	assert_eq!(movie.current_play_times(), 0);
	assert_eq!(movie.play_times(), 3);
	assert!(movie.is_playing());

	harness.events.clear();
	movie.advance_time(0.1, &mut harness.host());
	assert_eq!(harness.events[0].kind, EventKind::Start);
}

#[test]
fn completed_clip_replays_without_name() {
	let registry = walker_registry();
	let mut harness = Harness::default();
	let mut movie = harness.build(&registry, "walker");

	movie.play(Some("jump"), None).unwrap();
	movie.advance_time(5.0, &mut harness.host());
	assert_eq!(movie.state(), PlayState::Completed);

	movie.play(None, None).unwrap();
	assert_eq!(movie.state(), PlayState::Playing);
	assert_eq!(movie.clip_name(), Some("jump"));
	assert_eq!(movie.play_times(), 2);
}

#[test_log::test]
fn duplicate_movie_first_group_wins() {
	let mut registry = Registry::new();
	registry.add_group(walker_bytes("first"), atlas(), None).unwrap();
	registry.add_group(walker_bytes("second"), atlas(), None).unwrap();
	let mut harness = Harness::default();

	let lookup = registry.find_movie("walker", None).unwrap();
	assert_eq!(lookup.group_name, "first");
	assert_eq!(lookup.movie().name, "walker");

	let movie = harness.build(&registry, "walker");
	assert_eq!(movie.group_name(), "first");

	let movie = registry.build_movie_with("walker", Some("second"), &BuildOptions::nested(), &mut harness.host());
	assert_eq!(movie.unwrap().group_name(), "second");
}

#[test]
fn events_carry_movie_and_clip() {
	let registry = walker_registry();
	let mut harness = Harness::default();
	let mut movie = harness.build(&registry, "walker");
	movie.play(Some("walk"), None).unwrap();
	movie.advance_time(0.25, &mut harness.host());

	let event = harness.events.iter().find(|event| event.kind == EventKind::FrameEvent).unwrap();
	assert_eq!(event.movie, movie.id());
	assert_eq!(event.movie_name, "walker");
	assert_eq!(event.clip_name, "walk");
	assert_eq!(event.name.as_deref(), Some("k0"));
	assert_eq!(harness.frame_events(), vec!["k0", "k1"]);
}

#[test]
fn disposal_releases_node() {
	let registry = walker_registry();
	let mut harness = Harness::default();
	let mut movie = harness.build(&registry, "walker");
	let handle = movie.dispose_handle();

	movie.play(Some("walk"), None).unwrap();
	movie.advance_time(0.1, &mut harness.host());
	handle.request();
	movie.advance_time(0.1, &mut harness.host());

	assert!(movie.is_disposed());
	assert_eq!(harness.renderer.count(|call| *call == RenderCall::ReleaseNode(movie.node())), 1);
	assert!(matches!(movie.play(None, None), Err(MovieError::Disposed)));
}
