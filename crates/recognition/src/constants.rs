/// Recognition reads every Nth raw frame.
pub const FRAME_SKIP: u64 = 2;

/// Frames fed to the classifier per prediction.
pub const MIN_FRAMES: usize = 6;

/// Capacity of the sliding feature buffer.
pub const PREDICTION_WINDOW: usize = 20;

/// Features kept in the buffer after a pause is detected.
pub const PAUSE_BUFFER_KEEP: usize = 3;

/// Activity scan reads every Nth raw frame.
pub const ACTIVITY_SAMPLING_RATE: u64 = 5;

/// Length of one activity bucket, in seconds of source video.
pub const SEGMENT_DURATION_SECS: f64 = 2.0;

/// Buckets scoring above this count as containing a sign.
pub const ACTIVITY_FLOOR: f32 = 0.3;

/// Range the estimated word count is clamped to.
pub const MIN_WORD_COUNT: usize = 1;
pub const MAX_WORD_COUNT: usize = 6;

/// Activity score contributions.
pub const HAND_PRESENCE_WEIGHT: f32 = 0.5;
pub const POSE_PRESENCE_WEIGHT: f32 = 0.3;
pub const HAND_VISIBILITY_WEIGHT: f32 = 0.2;
