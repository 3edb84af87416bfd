use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::frame::Frame;

/// Which index the frames are conformed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignMethod {
    /// Timestamps present in every frame.
    #[default]
    Inner,
    /// Timestamps present in any frame.
    Outer,
    /// The first frame's timestamps.
    Left,
}

/// Reindexes every frame onto a common index.
///
/// Fewer than two frames are returned unchanged. Positions a frame did not
/// have are filled with `None`; pair this with `remove_missing_values` to
/// resolve them.
pub fn align_frames(frames: &[Frame], method: AlignMethod) -> Vec<Frame> {
    if frames.len() < 2 {
        return frames.to_vec();
    }

    let common = common_index(frames, method);
    tracing::debug!(frames = frames.len(), rows = common.len(), ?method, "Aligned frames");
    frames.iter().map(|f| f.reindex(&common)).collect()
}

fn common_index(frames: &[Frame], method: AlignMethod) -> Vec<DateTime<Utc>> {
    let first = frames[0].index().to_vec();
    match method {
        AlignMethod::Inner => frames[1..].iter().fold(first, |acc, f| {
            acc.into_iter()
                .filter(|ts| f.index().binary_search(ts).is_ok())
                .collect()
        }),
        AlignMethod::Outer => {
            let mut union: Vec<DateTime<Utc>> = frames
                .iter()
                .flat_map(|f| f.index().iter().copied())
                .collect();
            union.sort();
            union.dedup();
            union
        }
        AlignMethod::Left => first,
    }
}
