//! Randomized time-scrubbing properties

use std::sync::Arc;

use cutout_rs::prelude::*;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::common::{FRAME_RATE, Harness, WALK_KEYS, snapshots, walker_registry};

const ROUNDS: usize = 64;

fn key_index(name: &str) -> usize {
	WALK_KEYS.iter().position(|key| *key == name).unwrap()
}

/// Timeline key active at clip position `time`.
fn key_at(time: f64) -> &'static str {
	let step = (time * FRAME_RATE).floor() as usize;
	WALK_KEYS[(step / 2).min(WALK_KEYS.len() - 1)]
}

#[test_log::test]
fn finite_play_count_completes() {
	let registry = walker_registry();
	let mut rng = SmallRng::seed_from_u64(0x5eed);
	let mut harness = Harness::default();

	for _ in 0..ROUNDS {
		let mut movie = harness.build(&registry, "walker");
		let play_times = rng.random_range(1..4u32);
		movie.play(Some("jump"), Some(play_times)).unwrap();
		let limit = movie.total_time() * f64::from(play_times);

		let mut elapsed = 0.0;
		while elapsed < limit + 0.5 {
			let delta = rng.random_range(0.01..0.3);
			elapsed += delta;
			movie.advance_time(delta, &mut harness.host());
			assert!(movie.current_play_times() <= play_times);
			assert!(movie.current_time() <= movie.total_time());
		}

		assert!(movie.is_complete());
		assert!(!movie.is_playing());
		assert_eq!(movie.current_play_times(), play_times);
		assert_eq!(movie.current_time(), movie.total_time());
		let completes = harness.events.iter().filter(|event| event.kind == EventKind::Complete).count();
		assert_eq!(completes, 1);
		harness.events.clear();
	}
}

#[test]
fn infinite_play_wraps_time() {
	let registry = walker_registry();
	let mut rng = SmallRng::seed_from_u64(11);
	let mut harness = Harness::default();
	let mut movie = harness.build(&registry, "walker");
	movie.play(Some("walk"), Some(0)).unwrap();

	let mut elapsed = 0.0f64;
	for _ in 0..ROUNDS * 4 {
		let delta = rng.random_range(0.001..0.9);
		elapsed += delta;
		movie.advance_time(delta, &mut harness.host());

		assert!(!movie.is_complete());
		assert!((movie.current_time() - elapsed % 1.0).abs() < 1e-9);
		assert_eq!(movie.current_play_times(), elapsed.floor() as u32);
	}
}

#[test]
fn goto_and_stop_round_trip() {
	let registry = walker_registry();
	let mut rng = SmallRng::seed_from_u64(3);
	let mut harness = Harness::default();
	let mut movie = harness.build(&registry, "walker");

	for _ in 0..ROUNDS {
		let time = rng.random_range(-20.0..20.0);
		movie.goto_and_stop(Some("walk"), time, &mut harness.host()).unwrap();

		let expected = time.rem_euclid(1.0);
		assert!((movie.current_time() - expected).abs() < 1e-9, "{time}: {}", movie.current_time());
		assert_eq!(movie.state(), PlayState::Stopped);
		let frame = (movie.current_time() * 10.0).floor() as usize;
		assert_eq!(movie.cache_frame_index(), Some(frame.min(9)));
	}
}

#[test]
fn reversal_restores_pose() {
	let registry = walker_registry();
	let mut rng = SmallRng::seed_from_u64(99);
	let mut harness = Harness::default();
	let mut movie = harness.build(&registry, "walker");

	for _ in 0..ROUNDS {
		// stay clear of cache-frame boundaries
		let start = (rng.random_range(0..10u32) as f64 + 0.5) / 10.0;
		let distance = rng.random_range(0.05..1.5);

		movie.set_time_scale(1.0);
		movie.goto_and_play(Some("walk"), start, Some(0)).unwrap();
		movie.advance_time(1e-9, &mut harness.host());
		let frame = movie.cache_frame_index();
		let pose = snapshots(&movie);

		movie.advance_time(distance, &mut harness.host());
		movie.set_time_scale(-1.0);
		movie.advance_time(distance, &mut harness.host());

		assert_eq!(movie.cache_frame_index(), frame);
		assert_eq!(snapshots(&movie), pose);
	}
}

#[test_log::test]
fn frame_crossing_forward_is_complete_and_ordered() {
	let registry = walker_registry();
	let mut rng = SmallRng::seed_from_u64(42);
	let mut harness = Harness::default();
	let mut movie = harness.build(&registry, "walker");
	movie.play(Some("walk"), Some(0)).unwrap();

	for _ in 0..ROUNDS * 4 {
		let before = harness.frame_events().len();
		movie.advance_time(rng.random_range(0.01..0.15), &mut harness.host());

		let events = harness.frame_events();
		if events.len() > before {
			assert_eq!(events.last().map(String::as_str), Some(key_at(movie.current_time())));
		}
	}

	let events = harness.frame_events();
	assert!(events.len() > WALK_KEYS.len() * 4);
	assert_eq!(events[0], "k0");
	for pair in events.windows(2) {
		let expected = (key_index(&pair[0]) + 1) % WALK_KEYS.len();
		assert_eq!(key_index(&pair[1]), expected, "{pair:?}");
	}
}

#[test]
fn frame_crossing_backward_is_ordered() {
	let registry = walker_registry();
	let mut rng = SmallRng::seed_from_u64(7);
	let mut harness = Harness::default();
	let mut movie = harness.build(&registry, "walker");
	movie.goto_and_play(Some("walk"), 0.99, Some(0)).unwrap();
	movie.set_time_scale(-1.0);

	while movie.current_time() > 0.15 {
		movie.advance_time(rng.random_range(0.01..0.05), &mut harness.host());
		assert!(movie.is_reversing());
	}

	// frames are reported as they are left behind
	assert_eq!(harness.frame_events(), vec!["k4", "k3", "k2", "k1"]);
}

#[test]
fn cache_rectangles_are_memoized() {
	let registry = walker_registry();
	let mut rng = SmallRng::seed_from_u64(1234);
	let mut harness = Harness::default();
	let package = Arc::clone(registry.group("walkers").unwrap());
	let walk = package.movie(0).unwrap().find_clip("walk").unwrap();
	let cache = package.clip_cache(0, walk).unwrap();

	let mut first = harness.build(&registry, "walker");
	first.play(Some("walk"), Some(0)).unwrap();
	let mut seen = Vec::new();
	for _ in 0..ROUNDS * 2 {
		first.advance_time(rng.random_range(0.01..0.2), &mut harness.host());
		seen.push((first.cache_frame_index(), first.cache_rectangle()));
	}
	assert_eq!(cache.cached_count(), cache.frame_count());
	assert_eq!(cache.computations(), cache.frame_count());

	// a second instance reuses the shared table
	let mut second = harness.build(&registry, "walker");
	second.play(Some("walk"), Some(0)).unwrap();
	for _ in 0..ROUNDS {
		second.advance_time(rng.random_range(0.01..0.2), &mut harness.host());
		seen.push((second.cache_frame_index(), second.cache_rectangle()));
	}
	assert_eq!(cache.computations(), cache.frame_count());

	for (frame, rect) in seen {
		let stored = cache.get(frame.unwrap()).unwrap();
		assert_eq!(rect, Some(stored));
	}
}
