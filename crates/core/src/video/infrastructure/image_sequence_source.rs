use std::path::{Path, PathBuf};

use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;
use crate::shared::stream_info::StreamInfo;
use crate::video::domain::frame_source::FrameSource;

/// Replays the image files of one directory, in file-name order, as a
/// camera stream of RGB frames.
///
/// Stream dimensions come from the first image. Later images are delivered
/// at their own size.
pub struct ImageSequenceSource {
    dir: PathBuf,
    paths: Vec<PathBuf>,
}

impl ImageSequenceSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            paths: Vec::new(),
        }
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

fn decode(path: &Path, index: usize) -> Result<Frame, Box<dyn std::error::Error>> {
    let img = image::open(path)
        .map_err(|e| format!("{}: {e}", path.display()))?
        .to_rgb8();
    let (width, height) = img.dimensions();
    Ok(Frame::new(img.into_raw(), width, height, 3, index))
}

impl FrameSource for ImageSequenceSource {
    fn open(&mut self) -> Result<StreamInfo, Box<dyn std::error::Error>> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_image(p))
            .collect();
        paths.sort();

        let first = paths
            .first()
            .ok_or_else(|| format!("no image files in {}", self.dir.display()))?;
        let (width, height) = image::image_dimensions(first)
            .map_err(|e| format!("{}: {e}", first.display()))?;

        log::info!(
            "Opened {} frames from {} ({width}x{height})",
            paths.len(),
            self.dir.display()
        );
        let info = StreamInfo {
            width,
            height,
            total_frames: Some(paths.len()),
            source_path: Some(self.dir.clone()),
        };
        self.paths = paths;
        Ok(info)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        Box::new(
            self.paths
                .iter()
                .enumerate()
                .map(|(index, path)| decode(path, index)),
        )
    }

    fn close(&mut self) {
        self.paths.clear();
    }
}
