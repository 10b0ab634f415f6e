use std::time::Duration;

pub const RENDER_WIDTH: i32 = 1024;           // Width of the render texture
pub const RENDER_HEIGHT: i32 = 1024;          // Height of the render texture (radar imagery is square)
pub const FPS: u32 = 60;                      // Frames per second
pub const FRAME_TIME: f32 = 1.0 / FPS as f32; // Time per frame (seconds)

// The slight pause between every frame
pub const DELAY_NEXT_FRAME: Duration = Duration::from_millis(120);
// A longer pause on the last frame, marks the end of the loop before repeating
pub const DELAY_LAST_FRAME: Duration = Duration::from_millis(1000);

pub const DEFAULT_FRAME_NAME: &str = "frame";
pub const DEFAULT_MAP_NAME: &str = "map";
pub const DEFAULT_ROOT: &str = "./out";
pub const DOCKERIZED_ROOT: &str = "/data";
pub const DOCKERIZED_ENV: &str = "RLG_DOCKERIZED";

pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];
