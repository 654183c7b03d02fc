/// Greedy IoU face tracker.
///
/// Each frame's detections are matched to existing tracks by descending IoU.
/// Unmatched detections open new tracks; unmatched tracks age and are dropped
/// after `max_lost` frames. Lost tracks are kept for re-association and are
/// reported at their last region for the first `hold_frames` misses.
use std::collections::HashSet;

use crate::shared::region::FaceRegion;

const MATCH_THRESH: f64 = 0.3;

#[derive(Clone, Debug, PartialEq)]
pub struct TrackedFace {
    pub id: u32,
    pub region: FaceRegion,
}

#[derive(Clone, Debug)]
struct TrackState {
    id: u32,
    region: FaceRegion,
    frames_lost: usize,
    matched: bool,
}

pub struct FaceTracker {
    tracks: Vec<TrackState>,
    next_id: u32,
    max_lost: usize,
    hold_frames: usize,
}

impl FaceTracker {
    pub fn new(max_lost: usize) -> Self {
        Self {
            tracks: Vec::new(),
            next_id: 1,
            max_lost,
            hold_frames: 0,
        }
    }

    /// Keeps reporting a missed track for up to `frames` consecutive misses,
    /// capped at `max_lost`.
    pub fn with_hold(mut self, frames: usize) -> Self {
        self.hold_frames = frames.min(self.max_lost);
        self
    }

    pub fn update(&mut self, detections: &[FaceRegion]) -> Vec<TrackedFace> {
        for track in &mut self.tracks {
            track.matched = false;
        }
        let num_existing = self.tracks.len();

        let refs: Vec<(usize, FaceRegion)> =
            self.tracks.iter().enumerate().map(|(i, t)| (i, t.region)).collect();
        let mut matched_dets = HashSet::new();
        for (ti, di) in greedy_match(&refs, detections, MATCH_THRESH) {
            let track = &mut self.tracks[ti];
            track.region = detections[di];
            track.frames_lost = 0;
            track.matched = true;
            matched_dets.insert(di);
        }

        for (di, det) in detections.iter().enumerate() {
            if !matched_dets.contains(&di) {
                self.tracks.push(TrackState {
                    id: self.next_id,
                    region: *det,
                    frames_lost: 0,
                    matched: true,
                });
                self.next_id += 1;
            }
        }

        for track in self.tracks.iter_mut().take(num_existing) {
            if !track.matched {
                track.frames_lost += 1;
            }
        }
        let max_lost = self.max_lost;
        self.tracks.retain(|t| t.frames_lost <= max_lost);

        let hold = self.hold_frames;
        self.tracks
            .iter()
            .filter(|t| t.frames_lost <= hold)
            .map(|t| TrackedFace {
                id: t.id,
                region: t.region,
            })
            .collect()
    }

    /// Last known region of every live track, matched or not.
    pub fn regions(&self) -> Vec<FaceRegion> {
        self.tracks.iter().map(|t| t.region).collect()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Forgets every track and restarts id numbering.
    pub fn reset(&mut self) {
        self.tracks.clear();
        self.next_id = 1;
    }
}

/// Greedy IoU matching: pairs sorted by descending IoU, each track/detection
/// used at most once.
fn greedy_match(
    tracks: &[(usize, FaceRegion)],
    dets: &[FaceRegion],
    thresh: f64,
) -> Vec<(usize, usize)> {
    let mut pairs: Vec<(usize, usize, f64)> = Vec::new();
    for (ti, region) in tracks {
        for (di, det) in dets.iter().enumerate() {
            let score = region.iou(det);
            if score >= thresh {
                pairs.push((*ti, di, score));
            }
        }
    }
    pairs.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));

    let mut used_tracks = HashSet::new();
    let mut used_dets = HashSet::new();
    let mut matches = Vec::new();

    for (ti, di, _) in &pairs {
        if !used_tracks.contains(ti) && !used_dets.contains(di) {
            used_tracks.insert(*ti);
            used_dets.insert(*di);
            matches.push((*ti, *di));
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(x: i32, y: i32) -> FaceRegion {
        FaceRegion::new(x, y, 50, 50)
    }

    #[test]
    fn test_new_detections_get_unique_ids() {
        let mut tracker = FaceTracker::new(5);
        let tracks = tracker.update(&[face(0, 0), face(100, 100)]);
        assert_eq!(tracks.len(), 2);
        assert_ne!(tracks[0].id, tracks[1].id);
    }

    #[test]
    fn test_consistent_id_across_frames() {
        let mut tracker = FaceTracker::new(5);
        let id = tracker.update(&[face(10, 10)])[0].id;

        let t2 = tracker.update(&[face(12, 12)]);
        assert_eq!(t2.len(), 1);
        assert_eq!(t2[0].id, id);
        assert_eq!(t2[0].region, face(12, 12));
    }

    #[test]
    fn test_lost_track_removal() {
        let mut tracker = FaceTracker::new(2);
        tracker.update(&[face(10, 10)]);

        tracker.update(&[]);
        tracker.update(&[]);
        assert_eq!(tracker.len(), 1);
        tracker.update(&[]);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_held_track_reported_at_last_region() {
        let mut tracker = FaceTracker::new(5).with_hold(2);
        let id = tracker.update(&[face(10, 10)])[0].id;

        for _ in 0..2 {
            let held = tracker.update(&[]);
            assert_eq!(held, vec![TrackedFace { id, region: face(10, 10) }]);
        }
        assert!(tracker.update(&[]).is_empty());
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_hold_is_capped_by_max_lost() {
        let mut tracker = FaceTracker::new(1).with_hold(4);
        tracker.update(&[face(10, 10)]);
        assert_eq!(tracker.update(&[]).len(), 1);
        assert!(tracker.update(&[]).is_empty());
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_lost_track_is_kept_but_not_reported() {
        let mut tracker = FaceTracker::new(3);
        let id = tracker.update(&[face(10, 10)])[0].id;

        assert!(tracker.update(&[]).is_empty());
        assert_eq!(tracker.regions(), vec![face(10, 10)]);

        let t = tracker.update(&[face(11, 11)]);
        assert_eq!(t[0].id, id);
    }

    #[test]
    fn test_multiple_tracks_independent() {
        let mut tracker = FaceTracker::new(5);
        let t1 = tracker.update(&[face(0, 0), face(200, 200)]);
        let (id_a, id_b) = (t1[0].id, t1[1].id);

        let t2 = tracker.update(&[face(202, 202), face(2, 2)]);
        let ids: Vec<u32> = t2.iter().map(|t| t.id).collect();
        assert!(ids.contains(&id_a));
        assert!(ids.contains(&id_b));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_reset_clears_history_and_ids() {
        let mut tracker = FaceTracker::new(5);
        tracker.update(&[face(0, 0), face(200, 200)]);
        tracker.reset();

        assert!(tracker.is_empty());
        assert_eq!(tracker.update(&[face(0, 0)])[0].id, 1);
    }
}
