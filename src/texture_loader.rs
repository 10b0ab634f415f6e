use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use log::{debug, warn};
use raylib::prelude::*;
use exif::{Reader, Tag, Value, In};

use crate::constants::IMAGE_EXTENSIONS;

pub fn is_image_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false)
}

// --- Helper: Load and Sort Image Paths ---
pub fn load_sorted_image_paths(dir_path: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let entries = fs::read_dir(dir_path)
        .with_context(|| format!("Failed to read directory {}", dir_path.display()))?;

    for entry in entries {
        let path = entry.context("Failed to read directory entry")?.path();
        if is_image_file(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    if paths.is_empty() {
        bail!("No image files found in directory: {}", dir_path.display());
    }
    Ok(paths)
}

// --- Load Image, Apply EXIF Rotation, Create Texture ---
pub fn load_texture_with_exif_rotation(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    image_path: &Path,
) -> Result<Texture2D> {
    let file_bytes = fs::read(image_path)
        .with_context(|| format!("Failed to read file {}", image_path.display()))?;

    let extension = image_path.extension().and_then(|s| s.to_str()).unwrap_or("").to_lowercase();

    // EXIF orientation is only reliable for JPEG, radar PNGs never carry one
    let orientation = if extension == "jpg" || extension == "jpeg" {
        read_orientation(&file_bytes, image_path)
    } else {
        1
    };

    let mut image = Image::load_image_from_mem(&(".".to_string() + &extension), &file_bytes)
        .map_err(|e| anyhow::anyhow!("Failed to load image data for {}: {}", image_path.display(), e))?;

    // 1 = Top-left (Normal)
    // 3 = Bottom-right (180 deg)
    // 6 = Top-right (90 deg clockwise)
    // 8 = Bottom-left (270 deg clockwise / 90 deg counter-clockwise)
    // Others involve flips, ignored.
    match orientation {
        3 => {
            image.rotate_cw();
            image.rotate_cw();
            debug!("Applied 180 deg rotation to {}", image_path.display());
        }
        6 => {
            image.rotate_cw();
            debug!("Applied 90 deg CW rotation to {}", image_path.display());
        }
        8 => {
            image.rotate_ccw();
            debug!("Applied 90 deg CCW rotation to {}", image_path.display());
        }
        _ => {}
    }

    let texture = rl.load_texture_from_image(thread, &image)
        .map_err(|e| anyhow::anyhow!("Failed to create texture for {}: {}", image_path.display(), e))?;

    // CPU copy is no longer needed once uploaded
    drop(image);

    Ok(texture)
}

fn read_orientation(file_bytes: &[u8], image_path: &Path) -> u16 {
    match Reader::new().read_from_container(&mut Cursor::new(file_bytes)) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| match &field.value {
                Value::Short(values) => values.first().copied(),
                _ => None,
            })
            .unwrap_or(1),
        Err(e) => {
            warn!("Could not read EXIF data for {}: {}", image_path.display(), e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("radarloop-loader-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn sorted_paths_skip_non_images() {
        let dir = scratch_dir("sorted");
        for name in ["b.png", "a.JPG", "notes.txt", "c.gif"] {
            fs::write(dir.join(name), b"x").unwrap();
        }
        fs::create_dir(dir.join("nested.png")).unwrap();

        let names: Vec<String> = load_sorted_image_paths(&dir)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.JPG", "b.png", "c.gif"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = scratch_dir("empty");
        assert!(load_sorted_image_paths(&dir).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = env::temp_dir().join("radarloop-loader-does-not-exist");
        assert!(load_sorted_image_paths(&dir).is_err());
    }
}
