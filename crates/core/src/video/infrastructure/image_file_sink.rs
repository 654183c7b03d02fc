use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::video::domain::frame_sink::FrameSink;

/// "Displays" frames by writing each one to `frame_{index:06}.png` in a
/// directory, created on first use.
pub struct ImageFileSink {
    dir: PathBuf,
    written: usize,
}

impl ImageFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: 0,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame_{index:06}.png"))
    }
}

fn save(path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
    let (w, h) = (frame.width(), frame.height());
    let data = frame.data().to_vec();
    let invalid = || format!("frame {} does not match its dimensions", frame.index());
    match frame.channels() {
        1 => image::GrayImage::from_raw(w, h, data).ok_or_else(invalid)?.save(path)?,
        3 => image::RgbImage::from_raw(w, h, data).ok_or_else(invalid)?.save(path)?,
        4 => image::RgbaImage::from_raw(w, h, data).ok_or_else(invalid)?.save(path)?,
        n => return Err(format!("cannot write a {n}-channel frame").into()),
    }
    Ok(())
}

impl FrameSink for ImageFileSink {
    fn present(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if self.written == 0 {
            std::fs::create_dir_all(&self.dir)?;
        }
        save(&self.path_for(frame.index()), frame)?;
        self.written += 1;
        Ok(())
    }
}
