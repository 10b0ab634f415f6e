use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::Result;
use clap::Parser;

use crate::assets::{resolve_image_dir, validate_site_id, RadarAssets};
use crate::constants::*;

/// Play a loop of radar frames over a base map.
#[derive(Debug, Parser)]
#[command(name = "radarloop", version)]
pub struct Cli {
    /// Directory holding the map and frame images. Overrides --site, --root and --output
    pub dir: Option<PathBuf>,

    /// Four-letter radar site ID, images are read from <ROOT>/<site>
    #[arg(short, long)]
    pub site: Option<String>,

    /// Root of the generator output [default: /data when RLG_DOCKERIZED is set, ./out otherwise]
    #[arg(short = 'D', long)]
    pub root: Option<PathBuf>,

    /// Image directory, relative to the root unless absolute
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Base name of the frame files, as in <NAME>_<i>.png
    #[arg(short = 'f', long = "file", default_value = DEFAULT_FRAME_NAME)]
    pub frame_name: String,

    /// Base name of the map file, as in <NAME>.png
    #[arg(long, default_value = DEFAULT_MAP_NAME)]
    pub map_name: String,

    /// Do not draw the base map
    #[arg(long)]
    pub no_map: bool,

    /// Pause between frames, in milliseconds
    #[arg(long, default_value_t = DELAY_NEXT_FRAME.as_millis() as u64, value_parser = clap::value_parser!(u64).range(1..))]
    pub delay_next: u64,

    /// Pause on the last frame, in milliseconds
    #[arg(long, default_value_t = DELAY_LAST_FRAME.as_millis() as u64, value_parser = clap::value_parser!(u64).range(1..))]
    pub delay_last: u64,

    /// Show the frame counter and site ID
    #[arg(long)]
    pub hud: bool,

    /// Render the loop to a video file through ffmpeg instead of playing it
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Number of complete loops to export
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub loops: u64,
}

/// Everything the engine needs, resolved from the command line and environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub image_dir: PathBuf,
    pub site_id: Option<String>,
    pub frame_name: String,
    pub map_name: String,
    pub show_map: bool,
    pub short_delay: Duration,
    pub long_delay: Duration,
    pub hud: bool,
    pub export: Option<PathBuf>,
    pub loops: usize,
}

pub fn default_root() -> PathBuf {
    if env::var_os(DOCKERIZED_ENV).is_some() {
        PathBuf::from(DOCKERIZED_ROOT)
    } else {
        PathBuf::from(DEFAULT_ROOT)
    }
}

impl Settings {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        Self::resolve(cli, &default_root())
    }

    fn resolve(cli: Cli, default_root: &Path) -> Result<Self> {
        if let Some(site_id) = cli.site.as_deref() {
            validate_site_id(site_id)?;
        }

        let image_dir = match cli.dir {
            Some(dir) => dir,
            None => {
                let root = cli.root.as_deref().unwrap_or(default_root);
                resolve_image_dir(root, cli.site.as_deref(), cli.output.as_deref())?
            }
        };

        Ok(Self {
            image_dir,
            site_id: cli.site.map(|s| s.to_uppercase()),
            frame_name: cli.frame_name,
            map_name: cli.map_name,
            show_map: !cli.no_map,
            short_delay: Duration::from_millis(cli.delay_next),
            long_delay: Duration::from_millis(cli.delay_last),
            hud: cli.hud,
            export: cli.export,
            loops: cli.loops as usize,
        })
    }

    /// Radar files of the image directory. A hidden map is still looked up
    /// so it never ends up among the frames.
    pub fn discover_assets(&self) -> Result<RadarAssets> {
        let mut assets = RadarAssets::discover(&self.image_dir, &self.frame_name, &self.map_name)?;
        if !self.show_map {
            assets.map = None;
        }
        Ok(assets)
    }
}
