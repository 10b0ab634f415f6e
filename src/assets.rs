use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use log::{debug, info};

use crate::texture_loader::load_sorted_image_paths;

/// Image files making up one radar loop, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarAssets {
    pub map: Option<PathBuf>,
    pub frames: Vec<PathBuf>,
}

impl RadarAssets {
    /// Finds `<map_name>.png` and `<frame_name>_<i>.png` files in `dir`.
    ///
    /// Frames are ordered by their numeric index. When none match the naming
    /// scheme, every other image in the directory is used in file name order.
    pub fn discover(dir: &Path, frame_name: &str, map_name: &str) -> Result<Self> {
        let map = Some(dir.join(format!("{}.png", map_name))).filter(|p| p.is_file());
        if map.is_none() {
            debug!("No map '{}.png' in {}", map_name, dir.display());
        }

        let mut indexed = Vec::new();
        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?;
        for entry in entries {
            let path = entry.context("Failed to read directory entry")?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(index) = path.file_name().and_then(|n| n.to_str()).and_then(|n| frame_index(n, frame_name)) {
                indexed.push((index, path));
            }
        }
        indexed.sort_by_key(|(index, _)| *index);

        let frames: Vec<PathBuf> = if indexed.is_empty() {
            info!("No '{}_<i>.png' frames in {}, using every image instead", frame_name, dir.display());
            load_sorted_image_paths(dir)?
                .into_iter()
                .filter(|p| Some(p) != map.as_ref())
                .collect()
        } else {
            indexed.into_iter().map(|(_, path)| path).collect()
        };

        if frames.is_empty() {
            bail!("No radar frames found in directory: {}", dir.display());
        }

        Ok(Self { map, frames })
    }
}

/// Index `i` of a `<frame_name>_<i>.png` file name.
pub fn frame_index(file_name: &str, frame_name: &str) -> Option<u32> {
    let stem = file_name
        .strip_prefix(frame_name)?
        .strip_prefix('_')?;
    let (digits, ext) = stem.rsplit_once('.')?;
    if !ext.eq_ignore_ascii_case("png") || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Radar site IDs are four letters, starting with K, P, R or T.
pub fn validate_site_id(site_id: &str) -> Result<()> {
    if site_id.is_empty() {
        bail!("The site ID is not set");
    }
    let upper = site_id.to_ascii_uppercase();
    let valid = upper.len() == 4
        && upper.bytes().all(|b| b.is_ascii_uppercase())
        && matches!(upper.as_bytes()[0], b'K' | b'P' | b'R' | b'T');
    if !valid {
        bail!("The site ID '{}' does not match expected format", site_id);
    }
    Ok(())
}

/// Directory the generator writes a site's images to: `<root>/<site>`, or `output` resolved against `root`.
pub fn resolve_image_dir(root: &Path, site_id: Option<&str>, output: Option<&Path>) -> Result<PathBuf> {
    if let Some(output) = output {
        return Ok(if output.is_absolute() { output.to_path_buf() } else { root.join(output) });
    }
    match site_id {
        Some(site_id) => {
            validate_site_id(site_id)?;
            Ok(root.join(site_id.to_lowercase()))
        }
        None => bail!("Either an image directory or a site ID is required"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("radarloop-assets-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"x").unwrap();
        }
    }

    fn file_names(paths: &[PathBuf]) -> Vec<String> {
        paths.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn frames_are_ordered_numerically() {
        let dir = scratch_dir("numeric");
        touch(&dir, &["frame_10.png", "frame_2.png", "frame_0.png", "frame_legend.png", "map.png"]);

        let assets = RadarAssets::discover(&dir, "frame", "map").unwrap();
        assert_eq!(file_names(&assets.frames), vec!["frame_0.png", "frame_2.png", "frame_10.png"]);
        assert_eq!(assets.map, Some(dir.join("map.png")));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn custom_names_are_honoured() {
        let dir = scratch_dir("custom");
        touch(&dir, &["scan_1.png", "scan_0.png", "frame_0.png", "base.png"]);

        let assets = RadarAssets::discover(&dir, "scan", "base").unwrap();
        assert_eq!(file_names(&assets.frames), vec!["scan_0.png", "scan_1.png"]);
        assert_eq!(assets.map, Some(dir.join("base.png")));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn falls_back_to_name_order_without_map() {
        let dir = scratch_dir("fallback");
        touch(&dir, &["b.png", "a.jpg", "map.png", "readme.txt"]);

        let assets = RadarAssets::discover(&dir, "frame", "map").unwrap();
        assert_eq!(file_names(&assets.frames), vec!["a.jpg", "b.png"]);
        assert!(assets.map.is_some());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn custom_map_is_kept_out_of_fallback_frames() {
        let dir = scratch_dir("custom-map");
        touch(&dir, &["a.png", "b.png", "base.png"]);

        let assets = RadarAssets::discover(&dir, "frame", "base").unwrap();
        assert_eq!(file_names(&assets.frames), vec!["a.png", "b.png"]);
        assert_eq!(assets.map, Some(dir.join("base.png")));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn map_alone_is_not_a_loop() {
        let dir = scratch_dir("map-only");
        touch(&dir, &["map.png"]);

        assert!(RadarAssets::discover(&dir, "frame", "map").is_err());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn frame_index_parsing() {
        assert_eq!(frame_index("frame_3.png", "frame"), Some(3));
        assert_eq!(frame_index("frame_12.PNG", "frame"), Some(12));
        assert_eq!(frame_index("frame_legend.png", "frame"), None);
        assert_eq!(frame_index("frame_.png", "frame"), None);
        assert_eq!(frame_index("frame_3.jpg", "frame"), None);
        assert_eq!(frame_index("frames_3.png", "frame"), None);
    }

    #[test]
    fn site_ids() {
        assert!(validate_site_id("KTLX").is_ok());
        assert!(validate_site_id("tjua").is_ok());
        assert!(validate_site_id("PHKI").is_ok());
        assert!(validate_site_id("").is_err());
        assert!(validate_site_id("XTLX").is_err());
        assert!(validate_site_id("KTL").is_err());
        assert!(validate_site_id("KT1X").is_err());
        assert!(validate_site_id("KTLXX").is_err());
    }

    #[test]
    fn image_dir_resolution() {
        let root = Path::new("/data");
        assert_eq!(resolve_image_dir(root, Some("KTLX"), None).unwrap(), PathBuf::from("/data/ktlx"));
        assert_eq!(
            resolve_image_dir(root, Some("KTLX"), Some(Path::new("loops"))).unwrap(),
            PathBuf::from("/data/loops")
        );
        assert_eq!(
            resolve_image_dir(root, None, Some(Path::new("/tmp/loops"))).unwrap(),
            PathBuf::from("/tmp/loops")
        );
        assert!(resolve_image_dir(root, Some("nope"), None).is_err());
        assert!(resolve_image_dir(root, None, None).is_err());
    }
}
