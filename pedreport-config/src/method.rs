//! Analysis method selection.
//!
//! Each of the fixed methods (A, B, C, D, I, J) is configured by an optional
//! block in the settings file. A block that is present enables the method and
//! names the measurement areas it works on, optionally windowed by frame
//! ranges. All methods share one block layout so they are validated the same
//! way.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Tag of one analysis method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MethodTag {
    #[serde(alias = "a")]
    A,
    #[serde(alias = "b")]
    B,
    #[serde(alias = "c")]
    C,
    #[serde(alias = "d")]
    D,
    #[serde(alias = "i")]
    I,
    #[serde(alias = "j")]
    J,
}

impl MethodTag {
    pub const ALL: [MethodTag; 6] = [
        MethodTag::A,
        MethodTag::B,
        MethodTag::C,
        MethodTag::D,
        MethodTag::I,
        MethodTag::J,
    ];
}

impl fmt::Display for MethodTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            MethodTag::A => "A",
            MethodTag::B => "B",
            MethodTag::C => "C",
            MethodTag::D => "D",
            MethodTag::I => "I",
            MethodTag::J => "J",
        };
        f.write_str(letter)
    }
}

/// A method block as written in the settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MethodBlock {
    /// `false` makes the block behave as if it were absent.
    pub enabled: bool,

    /// IDs of the measurement areas evaluated by this method.
    pub measurement_areas: Vec<i32>,

    /// First frame of each window; `~` or `None` means from the start of the run.
    #[serde(deserialize_with = "deserialize_frames")]
    pub start_frames: Vec<Option<u32>>,

    /// Last frame of each window; `~` or `None` means until the end of the run.
    #[serde(deserialize_with = "deserialize_frames")]
    pub stop_frames: Vec<Option<u32>>,

    /// Consecutive `[begin, end)` frame pairs (method A).
    pub time_intervals: Vec<u32>,

    /// Individual flow/density output, one flag per measurement area.
    pub individual_fd: Vec<bool>,

    pub plot_time_series: bool,
}

impl Default for MethodBlock {
    fn default() -> Self {
        Self {
            enabled: true,
            measurement_areas: Vec::new(),
            start_frames: Vec::new(),
            stop_frames: Vec::new(),
            time_intervals: Vec::new(),
            individual_fd: Vec::new(),
            plot_time_series: false,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FrameValue {
    Num(u32),
    Str(String),
}

/// Frame bounds accept a number, `~`, or the literal `None`.
fn deserialize_frames<'de, D>(deserializer: D) -> Result<Vec<Option<u32>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Option<FrameValue>>::deserialize(deserializer)?;
    values
        .into_iter()
        .map(|value| match value {
            None => Ok(None),
            Some(FrameValue::Num(n)) => Ok(Some(n)),
            Some(FrameValue::Str(s)) => {
                let s = s.trim();
                if s.is_empty() || s.eq_ignore_ascii_case("none") {
                    Ok(None)
                } else {
                    s.parse().map(Some).map_err(serde::de::Error::custom)
                }
            }
        })
        .collect()
}

/// Validated, read-only selection of one method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodSelection {
    pub(crate) enabled: bool,
    pub(crate) area_ids: Vec<i32>,
    pub(crate) start_frames: Vec<Option<u32>>,
    pub(crate) stop_frames: Vec<Option<u32>>,
    pub(crate) time_intervals: Vec<u32>,
    pub(crate) individual_fd: Vec<bool>,
    pub(crate) plot_time_series: bool,
}

impl MethodSelection {
    /// Builds an enabled selection from a block that already passed validation.
    ///
    /// An empty `individual_fd` list is expanded to one `false` per area.
    pub(crate) fn from_block(block: MethodBlock) -> Self {
        let individual_fd = if block.individual_fd.is_empty() {
            vec![false; block.measurement_areas.len()]
        } else {
            block.individual_fd
        };
        Self {
            enabled: true,
            area_ids: block.measurement_areas,
            start_frames: block.start_frames,
            stop_frames: block.stop_frames,
            time_intervals: block.time_intervals,
            individual_fd,
            plot_time_series: block.plot_time_series,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn area_ids(&self) -> &[i32] {
        &self.area_ids
    }

    pub fn start_frames(&self) -> &[Option<u32>] {
        &self.start_frames
    }

    pub fn stop_frames(&self) -> &[Option<u32>] {
        &self.stop_frames
    }

    pub fn time_intervals(&self) -> &[u32] {
        &self.time_intervals
    }

    /// Time intervals as `(begin, end)` pairs.
    pub fn time_interval_pairs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.time_intervals
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
    }

    pub fn individual_fd(&self) -> &[bool] {
        &self.individual_fd
    }

    pub fn plot_time_series(&self) -> bool {
        self.plot_time_series
    }
}
