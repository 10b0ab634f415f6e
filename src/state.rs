#[derive(Debug, PartialEq, Clone, Copy)]
pub enum LoopState {
    Idle,    // Frames loaded, start() not called yet
    Running, // A delay is pending, the loop keeps advancing
    Halted,  // Lost the active frame or cancelled, nothing is scheduled anymore
}
