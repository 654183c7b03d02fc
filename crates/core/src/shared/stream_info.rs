use std::path::PathBuf;

/// Properties of a frame stream known once its source is opened.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
    /// `None` for live sources of unknown length.
    pub total_frames: Option<usize>,
    pub source_path: Option<PathBuf>,
}

impl StreamInfo {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            total_frames: None,
            source_path: None,
        }
    }
}
