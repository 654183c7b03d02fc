use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::video::domain::frame_sink::FrameSink;
use crate::video::domain::frame_source::FrameSource;
use crate::video::domain::permission_gate::{PermissionGate, PermissionStatus};

use super::frame_processor::FrameProcessor;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("failed to open frame source: {0}")]
    Source(Box<dyn std::error::Error>),
    #[error("display failed on frame {index}: {source}")]
    Sink {
        index: usize,
        source: Box<dyn std::error::Error>,
    },
}

/// Counts reported once a stream ends.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub authorized: bool,
    pub frames_processed: usize,
    pub frames_skipped: usize,
    pub frames_with_errors: usize,
    pub faces_detected: usize,
    pub cancelled: bool,
}

/// Drives one stream from a source through the processor to a sink.
///
/// Strictly serial: `on_stream_start`, every frame in order, then
/// `on_stream_stop`. Cancellation is checked between frames.
pub struct StreamRunner {
    cancelled: Arc<AtomicBool>,
}

impl Default for StreamRunner {
    fn default() -> Self {
        Self::new(Arc::new(AtomicBool::new(false)))
    }
}

impl StreamRunner {
    pub fn new(cancelled: Arc<AtomicBool>) -> Self {
        Self { cancelled }
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    pub fn run(
        &self,
        gate: &dyn PermissionGate,
        source: &mut dyn FrameSource,
        processor: &mut FrameProcessor,
        sink: &mut dyn FrameSink,
    ) -> Result<StreamSummary, StreamError> {
        if let PermissionStatus::Denied(reason) = gate.request() {
            log::error!("Camera access denied: {reason}");
            return Ok(StreamSummary::default());
        }

        let info = source.open().map_err(StreamError::Source)?;
        processor.on_stream_start(info.width, info.height);

        let mut summary = StreamSummary {
            authorized: true,
            ..StreamSummary::default()
        };
        let result = self.pump(source, processor, sink, &mut summary);

        processor.on_stream_stop();
        source.close();
        processor.log_summary();
        result.map(|()| summary)
    }

    fn pump(
        &self,
        source: &mut dyn FrameSource,
        processor: &mut FrameProcessor,
        sink: &mut dyn FrameSink,
        summary: &mut StreamSummary,
    ) -> Result<(), StreamError> {
        for (position, item) in source.frames().enumerate() {
            if self.cancelled.load(Ordering::Relaxed) {
                log::info!("Stream cancelled after {position} frames");
                summary.cancelled = true;
                break;
            }
            let frame = match item {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("Skipping frame {position}: {e}");
                    summary.frames_skipped += 1;
                    continue;
                }
            };

            let index = frame.index();
            let processed = processor.process_frame(frame);
            summary.frames_processed += 1;
            summary.faces_detected += processed.faces.len();
            if processed.error.is_some() {
                summary.frames_with_errors += 1;
            }
            sink.present(&processed.frame)
                .map_err(|source| StreamError::Sink { index, source })?;
        }
        Ok(())
    }
}
