pub const DEFAULT_IOU_THRESHOLD: f64 = 0.3;

/// A detected face: axis-aligned rectangle in frame-pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaceRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl FaceRegion {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn area(&self) -> i64 {
        self.width.max(0) as i64 * self.height.max(0) as i64
    }

    /// True when either side is shorter than `min_size`.
    pub fn is_smaller_than(&self, min_size: u32) -> bool {
        (self.width.max(0) as u32) < min_size || (self.height.max(0) as u32) < min_size
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Grows the rectangle by `ratio` of its size on every side.
    pub fn expand(&self, ratio: f64) -> Self {
        let dx = (self.width as f64 * ratio).round() as i32;
        let dy = (self.height as f64 * ratio).round() as i32;
        Self::new(
            self.x - dx,
            self.y - dy,
            self.width + 2 * dx,
            self.height + 2 * dy,
        )
    }

    /// Intersection with `[0, width) x [0, height)`, or `None` if nothing is left.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<Self> {
        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = self.right().min(width as i32);
        let y2 = self.bottom().min(height as i32);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(Self::new(x1, y1, x2 - x1, y2 - y1))
    }

    pub fn iou(&self, other: &FaceRegion) -> f64 {
        let ix1 = self.x.max(other.x);
        let iy1 = self.y.max(other.y);
        let ix2 = self.right().min(other.right());
        let iy2 = self.bottom().min(other.bottom());

        let inter = (ix2 - ix1).max(0) as f64 * (iy2 - iy1).max(0) as f64;
        if inter == 0.0 {
            return 0.0;
        }

        let area_a = self.width as f64 * self.height as f64;
        let area_b = other.width as f64 * other.height as f64;
        inter / (area_a + area_b - inter)
    }

    /// Greedy deduplication: keeps a region only if its IoU with every
    /// previously-kept region is at or below the threshold.
    pub fn deduplicate(regions: &[FaceRegion], iou_threshold: f64) -> Vec<FaceRegion> {
        if regions.len() <= 1 {
            return regions.to_vec();
        }
        let mut kept: Vec<FaceRegion> = Vec::with_capacity(regions.len());
        for r in regions {
            let dominated = kept.iter().any(|k| r.iou(k) > iou_threshold);
            if !dominated {
                kept.push(*r);
            }
        }
        kept
    }
}
