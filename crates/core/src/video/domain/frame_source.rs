use crate::shared::frame::Frame;
use crate::shared::stream_info::StreamInfo;

/// A camera-like producer of color frames.
///
/// Implementations handle decoding and device details while the pipeline
/// works with [`Frame`] and [`StreamInfo`].
pub trait FrameSource: Send {
    /// Prepares the source and reports the stream's dimensions.
    fn open(&mut self) -> Result<StreamInfo, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in capture order. A failed item is a
    /// single frame that could not be produced; later items may still succeed.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases any resources held by the source.
    fn close(&mut self);
}
