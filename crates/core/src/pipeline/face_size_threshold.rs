use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("relative face size must be in (0, 1], got {0}")]
pub struct InvalidFaceSize(pub f64);

/// Minimum face size: a fraction of frame height plus the pixel value
/// derived from it.
///
/// The pixel value is cached and only recomputed while unset, i.e. after
/// [`set_relative`](Self::set_relative) or [`invalidate`](Self::invalidate).
/// A height change alone does not re-derive it.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceSizeThreshold {
    relative: f64,
    absolute: u32,
}

const UNSET: u32 = 0;

impl FaceSizeThreshold {
    pub fn new(relative: f64) -> Result<Self, InvalidFaceSize> {
        validate(relative)?;
        Ok(Self {
            relative,
            absolute: UNSET,
        })
    }

    pub fn relative(&self) -> f64 {
        self.relative
    }

    /// Cached pixel size, `None` while unset.
    pub fn absolute(&self) -> Option<u32> {
        (self.absolute != UNSET).then_some(self.absolute)
    }

    /// Stores a new fraction and clears the cached pixel size.
    pub fn set_relative(&mut self, relative: f64) -> Result<(), InvalidFaceSize> {
        validate(relative)?;
        self.relative = relative;
        self.invalidate();
        Ok(())
    }

    pub fn invalidate(&mut self) {
        self.absolute = UNSET;
    }

    /// Derives the pixel size from `frame_height` if unset.
    ///
    /// A result that rounds to zero stays unset so the next frame retries.
    pub fn resolve(&mut self, frame_height: u32) -> Option<u32> {
        if self.absolute == UNSET {
            let size = (frame_height as f64 * self.relative).round();
            if size > 0.0 {
                self.absolute = size as u32;
            }
        }
        self.absolute()
    }
}

fn validate(relative: f64) -> Result<(), InvalidFaceSize> {
    if relative.is_finite() && relative > 0.0 && relative <= 1.0 {
        Ok(())
    } else {
        Err(InvalidFaceSize(relative))
    }
}
