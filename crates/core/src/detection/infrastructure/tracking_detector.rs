use crate::detection::domain::cascade_engine::{CascadeEngine, SearchParams};
use crate::detection::domain::face_detector::{
    ensure_searchable, DetectionError, FaceDetector, TrackingFaceDetector,
};
use crate::shared::constants::{
    FULL_SCAN_INTERVAL, MIN_NEIGHBORS, ROI_EXPANSION, SCALE_FACTOR, TRACKER_MAX_LOST,
    TRACK_HOLD_FRAMES,
};
use crate::shared::frame::LumaImage;
use crate::shared::region::{FaceRegion, DEFAULT_IOU_THRESHOLD};

use super::face_tracker::FaceTracker;

/// Stateful detector that follows faces across frames.
///
/// A full-frame search runs on the first frame after [`start`](TrackingFaceDetector::start),
/// whenever nothing is tracked, and every `full_scan_interval` frames. In
/// between, only a window around each live track is searched, which is much
/// cheaper than a full pyramid scan. A track whose window comes back empty
/// is still reported at its last region for a few frames, and the next frame
/// falls back to a full scan to re-acquire it.
///
/// Before `start` and after `stop`, `detect` returns no faces.
pub struct TrackingDetector {
    engine: Box<dyn CascadeEngine>,
    params: SearchParams,
    tracker: FaceTracker,
    full_scan_interval: usize,
    frames_since_scan: usize,
    started: bool,
}

impl TrackingDetector {
    /// `initial_min_face_size` is used until the first `configure` call.
    pub fn new(engine: Box<dyn CascadeEngine>, initial_min_face_size: u32) -> Self {
        Self {
            engine,
            params: SearchParams {
                scale_factor: SCALE_FACTOR,
                min_neighbors: MIN_NEIGHBORS,
                min_face_size: initial_min_face_size,
            },
            tracker: FaceTracker::new(TRACKER_MAX_LOST).with_hold(TRACK_HOLD_FRAMES),
            full_scan_interval: FULL_SCAN_INTERVAL,
            frames_since_scan: 0,
            started: false,
        }
    }

    pub fn with_full_scan_interval(mut self, interval: usize) -> Self {
        self.full_scan_interval = interval.max(1);
        self
    }

    pub fn min_face_size(&self) -> u32 {
        self.params.min_face_size
    }

    pub fn track_count(&self) -> usize {
        self.tracker.len()
    }

    fn reset_history(&mut self) {
        self.tracker.reset();
        self.frames_since_scan = 0;
    }

    /// Returns the deduplicated hits and whether any track's window came back
    /// empty.
    fn search_around_tracks(&mut self, image: &LumaImage) -> (Vec<FaceRegion>, bool) {
        let mut hits = Vec::new();
        let mut missed = false;
        for region in self.tracker.regions() {
            let roi = region
                .expand(ROI_EXPANSION)
                .clip_to(image.width(), image.height())
                .and_then(|window| image.crop(&window).map(|roi| (window, roi)));
            let Some((window, roi)) = roi else {
                missed = true;
                continue;
            };
            let found = self.engine.detect_multi_scale(&roi, &self.params);
            missed |= found.is_empty();
            hits.extend(found.into_iter().map(|r| r.translate(window.x, window.y)));
        }
        (FaceRegion::deduplicate(&hits, DEFAULT_IOU_THRESHOLD), missed)
    }
}

impl FaceDetector for TrackingDetector {
    fn configure(&mut self, min_face_size: u32) {
        self.params.min_face_size = min_face_size;
    }

    fn detect(&mut self, image: &LumaImage) -> Result<Vec<FaceRegion>, DetectionError> {
        if !self.started {
            return Ok(Vec::new());
        }
        ensure_searchable(image)?;

        let full_scan = self.frames_since_scan == 0 || self.tracker.is_empty();
        let (candidates, missed) = if full_scan {
            self.frames_since_scan = 0;
            (self.engine.detect_multi_scale(image, &self.params), false)
        } else {
            self.search_around_tracks(image)
        };
        self.frames_since_scan = if missed {
            0
        } else {
            (self.frames_since_scan + 1) % self.full_scan_interval
        };

        let min_size = self.params.min_face_size;
        let candidates: Vec<FaceRegion> = candidates
            .into_iter()
            .filter(|r| !r.is_smaller_than(min_size))
            .collect();

        Ok(self
            .tracker
            .update(&candidates)
            .into_iter()
            .map(|t| t.region)
            .collect())
    }
}

impl TrackingFaceDetector for TrackingDetector {
    fn start(&mut self) {
        if self.started {
            return;
        }
        self.reset_history();
        self.started = true;
        log::debug!("Tracking detector started");
    }

    fn stop(&mut self) {
        if !self.started {
            return;
        }
        self.started = false;
        self.reset_history();
        log::debug!("Tracking detector stopped");
    }

    fn is_started(&self) -> bool {
        self.started
    }
}
