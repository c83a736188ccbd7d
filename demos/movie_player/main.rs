//! Movie package utility.
//!
//! Provides four subcommands:
//! - `sample`: write a small generated package to disk.
//! - `inspect`: print the header, array table and movies of one package.
//! - `validate`: scan a directory and decode every package with strict checks.
//! - `play`: tick a movie headlessly and print renderer calls and events.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use cutout_rs::cutout_types::package::constants;
use cutout_rs::prelude::*;
use walkdir::WalkDir;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Sample(opts) => run_sample(opts),
		Command::Inspect(opts) => run_inspect(opts),
		Command::Validate(opts) => run_validate(opts),
		Command::Play(opts) => run_play(opts),
	}
}

#[derive(Parser)]
#[command(name = "movie_player")]
#[command(author = "cutout-rs project")]
#[command(version)]
#[command(about = "Inspect, validate and play cutout movie packages", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Write a generated sample package
	Sample(SampleArgs),
	/// Inspect a single package
	Inspect(InspectArgs),
	/// Decode every package under a directory
	Validate(ValidateArgs),
	/// Play a movie headlessly
	Play(PlayArgs),
}

#[derive(Args)]
struct SampleArgs {
	/// Output path
	#[arg(short, long, value_name = "FILE", default_value = "bird.cutout")]
	output: PathBuf,
}

#[derive(Args)]
struct InspectArgs {
	/// Path to a package
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Print the manifest as JSON instead of a summary
	#[arg(long, default_value_t = false)]
	json: bool,
}

#[derive(Args)]
struct ValidateArgs {
	/// Directory containing packages
	#[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
	root: PathBuf,

	/// File extension to scan for
	#[arg(short, long, default_value = "cutout")]
	extension: String,

	/// Recurse into sub-directories while scanning
	#[arg(short, long, default_value_t = false)]
	recursive: bool,

	/// Skip clip range and frame link checks
	#[arg(long, default_value_t = false)]
	lenient: bool,
}

#[derive(Args)]
struct PlayArgs {
	/// Path to a package
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Movie to build
	#[arg(short, long)]
	movie: String,

	/// Clip to play, the movie's default when omitted
	#[arg(short, long)]
	clip: Option<String>,

	/// Play count override, 0 loops forever
	#[arg(short, long)]
	times: Option<u32>,

	/// Seconds to play
	#[arg(short, long, default_value_t = 1.0)]
	seconds: f64,

	/// Ticks per second
	#[arg(long, default_value_t = 60)]
	rate: u32,

	/// Time scale, negative plays backwards
	#[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
	time_scale: f64,

	/// Atlas texture width and height
	#[arg(long, value_name = "PIXELS", default_value_t = 1024.0)]
	atlas_size: f32,

	/// Print every renderer call
	#[arg(short, long, default_value_t = false)]
	verbose: bool,
}

fn run_sample(args: SampleArgs) -> Result<()> {
	let builder = sample_builder();
	builder
		.save_to_file(&args.output)
		.with_context(|| format!("Failed to write {}", args.output.display()))?;
	println!("Wrote sample package to {}", args.output.display());
	println!("Try: movie_player play {} --movie bird --clip fly", args.output.display());
	Ok(())
}

/// Two-slot bird with a looping `fly` clip and a two-shot `flap` clip.
fn sample_builder() -> PackageBuilder {
	let mut builder = PackageBuilder::new("sample");
	let body_region = builder.add_rectangle(Rectangle::new(0.0, 0.0, 64.0, 32.0));
	let wing_region = builder.add_rectangle(Rectangle::new(64.0, 0.0, 32.0, 32.0));
	let body = builder.add_display(DisplayDescriptor::image("body", body_region)) as i16;
	let wing = builder.add_display(DisplayDescriptor::image("wing", wing_region)) as i16;
	let body_frame = builder.add_display_frame(body, -1);
	let wing_frame = builder.add_display_frame(wing, -1);

	let rest = builder.add_transform(Transform::translation(0.0, 0.0));
	let wing_transforms: Vec<i16> = (0..12)
		.map(|step| {
			let lift = (step as f32 * std::f32::consts::PI / 6.0).sin() * 8.0;
			builder.add_transform(Transform::translation(16.0, -lift))
		})
		.collect();

	let mut movie = MovieDescriptor::new("bird", 12.0);
	movie.action = Some("fly".to_string());
	movie.slot.push(SlotDescriptor::new("body"));
	movie.slot.push(SlotDescriptor::new("wing"));
	let movie = builder.add_movie(movie);

	let fly: Vec<[i16; 2]> =
		wing_transforms.iter().flat_map(|&wing_transform| [[body_frame, rest], [wing_frame, wing_transform]]).collect();
	let fly_clip = builder.add_clip(movie, "fly", 0, 1.0, 12.0, &fly);
	builder.set_timeline(
		movie,
		fly_clip,
		vec![
			(0.0, vec![ActionDescriptor::sound_event("wing-up")]),
			(0.5, vec![ActionDescriptor::sound_event("wing-down")]),
		],
	);

	let flap: Vec<[i16; 2]> = wing_transforms
		.iter()
		.step_by(2)
		.flat_map(|&wing_transform| [[body_frame, rest], [wing_frame, wing_transform]])
		.collect();
	let flap_clip = builder.add_clip(movie, "flap", 2, 0.5, 12.0, &flap);
	builder.set_timeline(
		movie,
		flap_clip,
		vec![(0.0, vec![ActionDescriptor::frame_event("flap")]), (0.25, vec![ActionDescriptor::frame_event("glide")])],
	);

	builder
}

fn run_inspect(args: InspectArgs) -> Result<()> {
	let data = std::fs::read(&args.file).with_context(|| format!("Failed to read {}", args.file.display()))?;
	let size = data.len();
	let package = Package::from_bytes(data).with_context(|| format!("Failed to decode {}", args.file.display()))?;

	if args.json {
		println!("{}", serde_json::to_string_pretty(package.manifest())?);
		return Ok(());
	}

	println!("File: {} (size: {size} bytes)", args.file.display());
	println!("Header: {}", hex::encode(package.header()));
	println!("Group: {} (version {})", package.name(), package.version());
	println!("Array base: {:#x}", package.array_base());

	let arrays = [
		("clip stream", package.clip_stream().len(), package.clip_stream().byte_offset()),
		("display frames", package.display_frames().len(), package.display_frames().byte_offset()),
		("rectangles", package.rectangles().len(), package.rectangles().byte_offset()),
		("transforms", package.transforms().len(), package.transforms().byte_offset()),
		("colors", package.colors().len(), package.colors().byte_offset()),
	];
	for (name, len, offset) in arrays {
		println!("  {name:<15} {len:>8} elements @ {offset:#x}");
	}
	println!(
		"Displays: {} | timeline frames: {} | records per display frame: {}",
		package.displays().len(),
		package.frames().len(),
		constants::DISPLAY_FRAME_STRIDE
	);

	for (movie_index, movie) in package.movies().iter().enumerate() {
		println!(
			"Movie '{}' @ {} fps, {} slots{}",
			movie.name,
			movie.frame_rate,
			movie.slot.len(),
			if movie.is_nested { ", nested" } else { "" }
		);
		for (clip_index, clip) in movie.clip.iter().enumerate() {
			let samples = package.clip_cache(movie_index, clip_index).map_or(0, |cache| cache.frame_count());
			let plays = if clip.play_times == 0 { "loop".to_string() } else { format!("x{}", clip.play_times) };
			println!(
				"  clip '{}': {:.3}s {plays}, {samples} cache frames, {} timeline steps",
				clip.name,
				clip.duration,
				clip.frame.len()
			);
		}
	}

	Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<()> {
	if !args.root.is_dir() {
		bail!("{} is not a directory", args.root.display());
	}

	let config = if args.lenient { ParseConfig::lenient() } else { ParseConfig::strict() };
	let files = collect_packages(&args.root, &args.extension, args.recursive);
	if files.is_empty() {
		println!("No .{} files found under {}", args.extension, args.root.display());
		return Ok(());
	}

	let mut failures = 0usize;
	for path in &files {
		match validate_file(path, &config) {
			Ok(summary) => println!("✅ {} - {summary}", path.display()),
			Err(error) => {
				failures += 1;
				println!("❌ {} - {error:#}", path.display());
			}
		}
	}

	println!();
	println!("Scanned {} files, {} failed", files.len(), failures);
	if failures > 0 {
		bail!("Validation finished with errors");
	}
	Ok(())
}

fn collect_packages(root: &Path, extension: &str, recursive: bool) -> Vec<PathBuf> {
	let walker = if recursive { WalkDir::new(root) } else { WalkDir::new(root).max_depth(1) };
	let mut files: Vec<PathBuf> = walker
		.into_iter()
		.filter_map(|entry| match entry {
			Ok(entry) => Some(entry),
			Err(error) => {
				log::warn!("Skipping unreadable entry: {error}");
				None
			}
		})
		.filter(|entry| entry.file_type().is_file())
		.map(walkdir::DirEntry::into_path)
		.filter(|path| path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(extension)))
		.collect();
	files.sort();
	files
}

fn validate_file(path: &Path, config: &ParseConfig) -> Result<String> {
	let data = std::fs::read(path).context("read failed")?;
	let package = Package::from_bytes_with_config(data, config)?;
	for movie_index in 0..package.movies().len() {
		let movie = &package.movies()[movie_index];
		for clip_index in 0..movie.clip.len() {
			package
				.clip_indices(movie_index, clip_index)
				.with_context(|| format!("movie '{}' clip {clip_index}", movie.name))?;
		}
	}
	Ok(format!("'{}' with {} movies", package.name(), package.movies().len()))
}

fn run_play(args: PlayArgs) -> Result<()> {
	if args.rate == 0 {
		bail!("rate must be greater than zero");
	}

	let data = std::fs::read(&args.file).with_context(|| format!("Failed to read {}", args.file.display()))?;
	let mut registry = Registry::new();
	let textures = vec![AtlasTexture::new("atlas", args.atlas_size, args.atlas_size)];
	registry.add_group(data, textures, None)?;

	let clock = Clock::new();
	let mut renderer = RecordingRenderer::new();
	let mut events: Vec<MovieEvent> = Vec::new();

	let mut movies = {
		let mut host = Host::new(&mut renderer, &mut events, &clock);
		vec![registry.build_movie(&args.movie, None, &mut host)?]
	};
	movies[0].set_time_scale(args.time_scale);
	movies[0].play(args.clip.as_deref(), args.times)?;
	println!(
		"Playing '{}' clip '{}' ({:.3}s)",
		movies[0].name(),
		movies[0].clip_name().unwrap_or("<none>"),
		movies[0].total_time()
	);
	print_calls(&mut renderer, args.verbose);

	let delta = 1.0 / f64::from(args.rate);
	let ticks = (args.seconds * f64::from(args.rate)).ceil() as u64;
	for tick in 1..=ticks {
		clock.tick(delta, &mut movies, &mut renderer, &mut events);

		let movie = &movies[0];
		for event in events.drain(..) {
			let name = event.name.as_deref().unwrap_or("");
			println!("[{:>6.3}s] {:<12} {name}", clock.time(), event.kind.to_string());
		}
		if args.verbose {
			println!(
				"tick {tick}: time {:.3} cache frame {:?} loops {}",
				movie.current_time(),
				movie.cache_frame_index(),
				movie.current_play_times()
			);
		}
		print_calls(&mut renderer, args.verbose);

		if movie.is_complete() && !movie.is_playing() {
			println!("Completed after {tick} ticks");
			break;
		}
	}

	let mut host = Host::new(&mut renderer, &mut events, &clock);
	movies[0].dispose(&mut host);
	Ok(())
}

fn print_calls(renderer: &mut RecordingRenderer, verbose: bool) {
	let calls = renderer.take();
	if verbose {
		for call in calls {
			println!("    {call:?}");
		}
	}
}
