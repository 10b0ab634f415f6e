use std::io::Write;
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use anyhow::{Context, Result};
use log::{info, warn};
use raylib::prelude::*;

/// Pipes raw RGBA frames into an ffmpeg process encoding an H.264 video.
pub struct Ffmpeg {
    process: Child,
    stdin: Option<ChildStdin>,
}

impl Ffmpeg {
    pub fn new(width: i32, height: i32, fps: u32, video_path: &Path) -> Result<Ffmpeg> {
        let mut process = Command::new("ffmpeg")
            .stdin(Stdio::piped())
            .args(["-loglevel", "error"])
            .arg("-y")
            .args(["-f", "rawvideo"])
            .args(["-pixel_format", "rgba"])
            .args(["-video_size", &format!("{}x{}", width, height)])
            .args(["-framerate", &format!("{}", fps)])
            .args(["-i", "-"])
            .args(["-c:v", "libx264"])
            .args(["-pix_fmt", "yuv420p"])
            .arg(video_path)
            .spawn()
            .context("Failed to start ffmpeg process")?;
        let stdin = process.stdin.take().context("Failed to open ffmpeg stdin")?;
        info!("Exporting radar loop to {}", video_path.display());
        Ok(Ffmpeg { process, stdin: Some(stdin) })
    }

    pub fn write(&mut self, image: &Image) -> Result<()> {
        let stdin = self.stdin.as_mut().context("ffmpeg stdin already closed")?;

        let width = image.width() as usize;
        let height = image.height() as usize;
        let row_len = width * 4; // 4 bytes per pixel (RGBA)

        let image_slice = unsafe {
            std::slice::from_raw_parts(image.data() as *const u8, row_len * height)
        };

        // Render textures come out bottom to top, ffmpeg wants top to bottom
        for row in image_slice.chunks_exact(row_len).rev() {
            stdin.write_all(row).context("Failed to write to ffmpeg stdin")?;
        }
        Ok(())
    }
}

impl Drop for Ffmpeg {
    fn drop(&mut self) {
        // Closing stdin lets ffmpeg finish the file
        self.stdin = None;
        match self.process.wait() {
            Ok(status) if !status.success() => warn!("ffmpeg exited with {}", status),
            Ok(_) => info!("Export finished"),
            Err(e) => warn!("Failed to wait for ffmpeg process: {}", e),
        }
    }
}
