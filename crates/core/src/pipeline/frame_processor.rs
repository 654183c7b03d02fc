use std::time::Instant;

use thiserror::Error;

use crate::detection::domain::detector_bank::DetectorBank;
use crate::detection::domain::detector_selection::DetectorSelection;
use crate::detection::domain::face_detector::DetectionError;
use crate::shared::frame::{Frame, LumaImage};
use crate::shared::region::FaceRegion;

use super::configuration_controller::ConfigurationController;
use super::face_size_threshold::InvalidFaceSize;
use super::frame_annotator::FrameAnnotator;
use super::pipeline_logger::{NullPipelineLogger, PipelineLogger};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("frame received before the stream started")]
    StreamNotStarted,
    #[error("no {0} detector is available")]
    DetectorUnavailable(DetectorSelection),
    #[error(transparent)]
    InvalidFaceSize(#[from] InvalidFaceSize),
}

/// A recoverable failure while handling one frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Detection(#[from] DetectionError),
}

/// Output of [`FrameProcessor::process_frame`].
///
/// `frame` is always present with the input's dimensions. On a
/// configuration error it is returned unannotated and `faces` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedFrame {
    pub frame: Frame,
    pub faces: Vec<FaceRegion>,
    pub error: Option<FrameError>,
}

impl ProcessedFrame {
    fn unannotated(frame: Frame, error: FrameError) -> Self {
        Self {
            frame,
            faces: Vec::new(),
            error: Some(error),
        }
    }
}

struct FrameBuffers {
    luma: LumaImage,
}

enum StreamState {
    Uninitialized,
    Ready(FrameBuffers),
}

/// Turns each camera frame into an annotated frame.
///
/// Lifecycle: [`on_stream_start`](Self::on_stream_start), any number of
/// [`process_frame`](Self::process_frame) calls, then
/// [`on_stream_stop`](Self::on_stream_stop). Configuration commands queued
/// on the controller's channel are applied at the top of every frame.
pub struct FrameProcessor {
    detectors: DetectorBank,
    controller: ConfigurationController,
    annotator: FrameAnnotator,
    logger: Box<dyn PipelineLogger>,
    state: StreamState,
}

impl FrameProcessor {
    pub fn new(mut detectors: DetectorBank, controller: ConfigurationController) -> Self {
        controller.sync_lifecycle(&mut detectors);
        Self {
            detectors,
            controller,
            annotator: FrameAnnotator::default(),
            logger: Box::new(NullPipelineLogger),
            state: StreamState::Uninitialized,
        }
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, StreamState::Ready(_))
    }

    pub fn selection(&self) -> DetectorSelection {
        self.controller.selection()
    }

    /// Pixel threshold currently pushed to the detectors, `None` while unset.
    pub fn absolute_face_size(&self) -> Option<u32> {
        self.controller.threshold().absolute()
    }

    pub fn detectors(&self) -> &DetectorBank {
        &self.detectors
    }

    pub fn log_summary(&self) {
        self.logger.summary();
    }

    /// Allocates per-stream buffers and clears the cached pixel threshold.
    pub fn on_stream_start(&mut self, width: u32, height: u32) {
        self.controller.apply_pending(&mut self.detectors);
        self.controller.threshold_mut().invalidate();
        self.state = StreamState::Ready(FrameBuffers {
            luma: LumaImage::with_size(width, height),
        });
        log::info!("Stream started at {width}x{height}");
    }

    pub fn on_stream_stop(&mut self) {
        if matches!(self.state, StreamState::Ready(_)) {
            log::info!("Stream stopped");
        }
        self.state = StreamState::Uninitialized;
    }

    /// Detects faces in `frame` and outlines them.
    ///
    /// Never fails: detection errors are logged and count as no faces,
    /// configuration errors leave the frame unannotated. Either is reported
    /// in [`ProcessedFrame::error`]. Every frame, including rejected ones,
    /// is reported to the logger.
    pub fn process_frame(&mut self, frame: Frame) -> ProcessedFrame {
        let frame_start = Instant::now();
        let processed = self.run_stages(frame);
        self.logger
            .frame_completed(processed.frame.index(), elapsed_ms(frame_start));
        processed
    }

    fn run_stages(&mut self, mut frame: Frame) -> ProcessedFrame {
        self.controller.apply_pending(&mut self.detectors);

        let StreamState::Ready(buffers) = &mut self.state else {
            log::warn!("Frame {} dropped: stream not started", frame.index());
            return ProcessedFrame::unannotated(frame, ConfigurationError::StreamNotStarted.into());
        };

        let t = Instant::now();
        if let Err(channels) = buffers.luma.fill_from(&frame) {
            log::warn!("Frame {}: unsupported {channels}-channel layout", frame.index());
            return ProcessedFrame::unannotated(
                frame,
                DetectionError::UnsupportedChannels(channels).into(),
            );
        }
        self.logger.timing("convert", elapsed_ms(t));

        let selection = self.controller.selection();
        if let Some(min_face_size) = self.controller.threshold_mut().resolve(frame.height()) {
            self.detectors.configure(selection, min_face_size);
        }

        let t = Instant::now();
        let (faces, error) = match self.detectors.detect(selection, &buffers.luma) {
            None => {
                log::warn!("Frame {}: no {selection} detector", frame.index());
                return ProcessedFrame::unannotated(
                    frame,
                    ConfigurationError::DetectorUnavailable(selection).into(),
                );
            }
            Some(Ok(faces)) => (faces, None),
            Some(Err(e)) => {
                log::warn!("Frame {}: detection failed: {e}", frame.index());
                (Vec::new(), Some(FrameError::from(e)))
            }
        };
        self.logger.timing("detect", elapsed_ms(t));
        self.logger.metric("faces", faces.len() as f64);

        let t = Instant::now();
        self.annotator.annotate(&mut frame, &faces);
        self.logger.timing("annotate", elapsed_ms(t));

        ProcessedFrame { frame, faces, error }
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
