use crate::shared::frame::Frame;

/// Receives annotated frames for display, one per processed frame.
pub trait FrameSink: Send {
    fn present(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;
}
