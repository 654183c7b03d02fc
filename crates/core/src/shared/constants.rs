/// File name the bundled cascade model is staged under.
pub const CASCADE_MODEL_NAME: &str = "seeta_fd_frontal_v1.0.bin";

/// Minimum face size as a fraction of frame height.
pub const DEFAULT_RELATIVE_FACE_SIZE: f64 = 0.2;

/// Relative sizes offered to the command source (50%, 40%, 30%, 20%).
pub const RELATIVE_FACE_SIZE_PRESETS: [f64; 4] = [0.5, 0.4, 0.3, 0.2];

/// Scale step between pyramid levels of the multi-scale search.
pub const SCALE_FACTOR: f64 = 1.1;

/// Overlapping hits required before a candidate is reported.
pub const MIN_NEIGHBORS: u32 = 2;

/// RGBA highlight drawn around each detected face.
pub const FACE_RECT_COLOR: [u8; 4] = [0, 255, 0, 255];

pub const FACE_RECT_THICKNESS: u32 = 3;

/// Frames a track may go unmatched before it is dropped.
pub const TRACKER_MAX_LOST: usize = 5;

/// Misses a track survives while still being shown at its last region.
pub const TRACK_HOLD_FRAMES: usize = 3;

/// The tracking detector re-scans the whole frame every N frames.
pub const FULL_SCAN_INTERVAL: usize = 5;

/// Fraction of a tracked face's size searched around it on each side.
pub const ROI_EXPANSION: f64 = 0.5;

/// Frame budget at 30 fps.
pub const DEFAULT_FRAME_BUDGET_MS: f64 = 1000.0 / 30.0;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
