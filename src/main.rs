//! Tile Strata entry point
//!
//! Loads a map, drops a hero on it and walks a fixed route, logging where
//! the hero ends up after each leg.
//!
//! Usage: `tile-strata [-v] <MAP> [SETTINGS]`

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use glam::IVec2;

use tile_strata::map::TileMap;
use tile_strata::resources::ResourceCache;
use tile_strata::settings::Settings;
use tile_strata::sim::{Avatar, TickInput, World, tick};

/// Fixed frame time in milliseconds
const FRAME_MS: f32 = 1000.0 / 60.0;

/// Scripted walk: held direction and how long to hold it
const ROUTE: [(IVec2, f32); 6] = [
    (IVec2::new(1, 0), 1000.0),
    (IVec2::new(0, 1), 800.0),
    (IVec2::new(-1, 1), 600.0),
    (IVec2::new(-1, 0), 1000.0),
    (IVec2::new(0, -1), 800.0),
    (IVec2::ZERO, 200.0),
];

#[derive(Parser)]
#[command(name = "tile-strata")]
#[command(about = "Walk a hero across a stacked tile map", long_about = None)]
struct Args {
    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
    /// Map JSON file
    map: PathBuf,
    /// Optional settings JSON file
    settings: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    log::info!("Tile Strata starting...");

    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let map = TileMap::load(&args.map)?;
    let mut resources = ResourceCache::new();
    let mut world = World::from_map(&map, settings, &mut resources)?;

    let hero = match world.find_avatar("hero") {
        Some(id) => id,
        None => {
            let start_level = world.levels().level_numbers().first().copied().unwrap_or(0);
            let avatar = Avatar::builder(
                world.pixel_width as f32 / 2.0,
                world.pixel_height as f32 / 2.0,
            )
            .identifier("hero")
            .level(start_level)
            .build(&world.settings);
            world.add_avatar(avatar)?
        }
    };
    world.track(Some(hero))?;

    for (direction, duration) in ROUTE {
        let mut elapsed = 0.0;
        let input = TickInput {
            direction,
            ..Default::default()
        };
        while elapsed < duration {
            let report = tick(&mut world, hero, &input, FRAME_MS)?;
            if let Some(change) = report.outcome.level_change {
                log::info!("Level {} -> {}", change.from, change.to);
            }
            elapsed += FRAME_MS;
        }

        if let Some(a) = world.avatar(hero) {
            log::info!(
                "Hero at ({:.1}, {:.1}) level {} z={:.1} facing {:?}",
                a.pos.x,
                a.pos.y,
                a.level,
                a.z,
                a.dir
            );
        }
    }

    let visible: Vec<&str> = world.visible_layers().map(|l| l.name.as_str()).collect();
    log::info!("Visible layers: {}", visible.join(", "));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_args_positional_and_verbose() {
        let args = Args::try_parse_from(["tile-strata", "-v", "map.json", "tune.json"]).unwrap();
        assert!(args.verbose);
        assert_eq!(args.map, PathBuf::from("map.json"));
        assert_eq!(args.settings, Some(PathBuf::from("tune.json")));

        let args = Args::try_parse_from(["tile-strata", "map.json"]).unwrap();
        assert!(!args.verbose);
        assert_eq!(args.settings, None);
    }

    #[test]
    fn test_help_and_bad_flags_are_not_map_paths() {
        let err = Args::try_parse_from(["tile-strata", "--help"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);

        let err = Args::try_parse_from(["tile-strata", "-x", "map.json"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);

        let err = Args::try_parse_from(["tile-strata"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }
}
