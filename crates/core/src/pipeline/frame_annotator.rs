use ndarray::{s, Axis};

use crate::shared::constants::{FACE_RECT_COLOR, FACE_RECT_THICKNESS};
use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// Draws face outlines into a frame in place.
///
/// The stroke is centered on the rectangle edge running from `(x, y)` to
/// `(x + width, y + height)`. Parts falling outside the frame are clipped.
/// Only the first `channels` components of `color` are written, so a gray
/// frame receives the red component and an RGB frame skips alpha.
#[derive(Clone, Copy, Debug)]
pub struct FrameAnnotator {
    color: [u8; 4],
    thickness: u32,
}

impl Default for FrameAnnotator {
    fn default() -> Self {
        Self::new(FACE_RECT_COLOR, FACE_RECT_THICKNESS)
    }
}

impl FrameAnnotator {
    pub fn new(color: [u8; 4], thickness: u32) -> Self {
        Self {
            color,
            thickness: thickness.max(1),
        }
    }

    pub fn annotate(&self, frame: &mut Frame, regions: &[FaceRegion]) {
        if frame.is_empty() {
            return;
        }
        for region in regions {
            self.outline(frame, region);
        }
    }

    fn outline(&self, frame: &mut Frame, region: &FaceRegion) {
        let before = (self.thickness as i32 - 1) / 2;
        let after = self.thickness as i32 / 2;
        let (left, top) = (region.x, region.y);
        let (right, bottom) = (region.right(), region.bottom());

        let outer_left = left - before;
        let outer_right = right + after;
        self.fill(frame, outer_left, top - before, outer_right, top + after);
        self.fill(frame, outer_left, bottom - before, outer_right, bottom + after);
        self.fill(frame, left - before, top, left + after, bottom);
        self.fill(frame, right - before, top, right + after, bottom);
    }

    /// Fills the inclusive box `[x0, x1] x [y0, y1]` after clipping.
    fn fill(&self, frame: &mut Frame, x0: i32, y0: i32, x1: i32, y1: i32) {
        let max_x = frame.width() as i32 - 1;
        let max_y = frame.height() as i32 - 1;
        let (x0, x1) = (x0.max(0), x1.min(max_x));
        let (y0, y1) = (y0.max(0), y1.min(max_y));
        if x0 > x1 || y0 > y1 {
            return;
        }

        let channels = frame.channels() as usize;
        let color = &self.color[..channels.min(self.color.len())];
        let mut pixels = frame.as_ndarray_mut();
        let mut band = pixels.slice_mut(s![
            y0 as usize..=y1 as usize,
            x0 as usize..=x1 as usize,
            ..
        ]);
        for mut px in band.lanes_mut(Axis(2)) {
            for (dst, &src) in px.iter_mut().zip(color) {
                *dst = src;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: [u8; 3] = [0, 255, 0];

    fn pixel(frame: &Frame, x: u32, y: u32) -> Vec<u8> {
        let c = frame.channels() as usize;
        let i = ((y * frame.width() + x) as usize) * c;
        frame.data()[i..i + c].to_vec()
    }

    fn painted(frame: &Frame) -> usize {
        (0..frame.height())
            .flat_map(|y| (0..frame.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| pixel(frame, x, y) != vec![0; frame.channels() as usize])
            .count()
    }

    #[test]
    fn test_no_regions_leaves_frame_untouched() {
        let mut frame = Frame::filled(20, 10, &[7, 8, 9], 0);
        let before = frame.clone();
        FrameAnnotator::default().annotate(&mut frame, &[]);
        assert_eq!(frame, before);
    }

    #[test]
    fn test_outline_edges_are_colored_interior_is_not() {
        let mut frame = Frame::filled(40, 40, &[0, 0, 0], 0);
        FrameAnnotator::default().annotate(&mut frame, &[FaceRegion::new(10, 10, 20, 20)]);

        // Stroke 3 centered on each edge.
        for offset in [9, 10, 11] {
            assert_eq!(pixel(&frame, 20, offset), GREEN);
            assert_eq!(pixel(&frame, offset, 20), GREEN);
            assert_eq!(pixel(&frame, 20, offset + 20), GREEN);
            assert_eq!(pixel(&frame, offset + 20, 20), GREEN);
        }
        assert_eq!(pixel(&frame, 20, 8), vec![0, 0, 0]);
        assert_eq!(pixel(&frame, 20, 20), vec![0, 0, 0]);
        assert_eq!(pixel(&frame, 12, 12), vec![0, 0, 0]);
    }

    #[test]
    fn test_outline_is_clipped_to_frame() {
        let mut frame = Frame::filled(10, 10, &[0, 0, 0], 0);
        FrameAnnotator::default().annotate(&mut frame, &[FaceRegion::new(-5, -5, 30, 30)]);
        assert_eq!(painted(&frame), 0);

        FrameAnnotator::default().annotate(&mut frame, &[FaceRegion::new(0, 0, 9, 9)]);
        assert_eq!(pixel(&frame, 0, 5), GREEN);
        assert_eq!(pixel(&frame, 9, 5), GREEN);
    }

    #[test]
    fn test_region_fully_outside_is_ignored() {
        let mut frame = Frame::filled(10, 10, &[0, 0, 0], 0);
        FrameAnnotator::default().annotate(&mut frame, &[FaceRegion::new(50, 50, 10, 10)]);
        assert_eq!(painted(&frame), 0);
    }

    #[test]
    fn test_color_follows_channel_count() {
        let mut rgba = Frame::filled(8, 8, &[0, 0, 0, 0], 0);
        FrameAnnotator::default().annotate(&mut rgba, &[FaceRegion::new(2, 2, 4, 4)]);
        assert_eq!(pixel(&rgba, 2, 4), vec![0, 255, 0, 255]);

        let mut gray = Frame::filled(8, 8, &[9], 0);
        FrameAnnotator::new([200, 1, 2, 3], 1).annotate(&mut gray, &[FaceRegion::new(2, 2, 4, 4)]);
        assert_eq!(pixel(&gray, 2, 4), vec![200]);
        assert_eq!(pixel(&gray, 4, 4), vec![9]);
    }

    #[test]
    fn test_thickness_one_draws_single_pixel_edge() {
        let mut frame = Frame::filled(20, 20, &[0, 0, 0], 0);
        FrameAnnotator::new(FACE_RECT_COLOR, 1).annotate(&mut frame, &[FaceRegion::new(5, 5, 10, 10)]);
        assert_eq!(pixel(&frame, 10, 5), GREEN);
        assert_eq!(pixel(&frame, 10, 4), vec![0, 0, 0]);
        assert_eq!(pixel(&frame, 10, 6), vec![0, 0, 0]);
        // 4 edges of an 11x11 inclusive box.
        assert_eq!(painted(&frame), 40);
    }

    #[test]
    fn test_dimensions_unchanged() {
        let mut frame = Frame::filled(33, 17, &[1, 2, 3], 4);
        FrameAnnotator::default().annotate(&mut frame, &[FaceRegion::new(1, 1, 30, 14)]);
        assert_eq!((frame.width(), frame.height(), frame.channels()), (33, 17, 3));
        assert_eq!(frame.index(), 4);
    }
}
