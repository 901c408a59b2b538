//! Wealth and illness bubble chart: per-wave frames, axis scales, and the
//! play/pause wave player that drives them.

use crate::api::RawAnimationRecord;
use crate::domain::wave_number;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationPoint {
    pub region: String,
    pub wave: u32,
    pub avg_income: f64,
    pub illness: f64,
}

impl AnimationPoint {
    pub fn from_record(record: &RawAnimationRecord) -> Option<Self> {
        Some(Self {
            region: record.region.clone()?,
            wave: wave_number(record.wave.as_deref()?)?,
            avg_income: record.average_income?,
            illness: record.illness_percentage?,
        })
    }
}

/// Distinct wave numbers, ascending.
pub fn timeline(points: &[AnimationPoint]) -> Vec<u32> {
    let mut waves: Vec<u32> = points.iter().map(|point| point.wave).collect();
    waves.sort_unstable();
    waves.dedup();
    waves
}

pub fn frame(points: &[AnimationPoint], wave: u32) -> Vec<&AnimationPoint> {
    points.iter().filter(|point| point.wave == wave).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LogScale {
    pub domain: (f64, f64),
}

impl LogScale {
    /// Position of `value` in the domain as a 0..1 fraction.
    pub fn unit(&self, value: f64) -> f64 {
        let (low, high) = (self.domain.0.ln(), self.domain.1.ln());
        if value <= 0.0 || (high - low).abs() < f64::EPSILON {
            return 0.0;
        }
        (value.ln() - low) / (high - low)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
}

impl LinearScale {
    pub fn unit(&self, value: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        if span.abs() < f64::EPSILON {
            return 0.0;
        }
        (value - self.domain.0) / span
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SqrtScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl SqrtScale {
    pub fn scale(&self, value: f64) -> f64 {
        let (low, high) = (self.domain.0.max(0.0).sqrt(), self.domain.1.max(0.0).sqrt());
        let t = if (high - low).abs() < f64::EPSILON {
            0.0
        } else {
            (value.max(0.0).sqrt() - low) / (high - low)
        };
        (self.range.1 - self.range.0).mul_add(t, self.range.0)
    }
}

/// Axis and bubble scales, fixed over every wave so frames are comparable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scales {
    pub income: LogScale,
    pub illness: LinearScale,
    pub radius: SqrtScale,
}

pub const MIN_INCOME: f64 = 100.0;
const HEADROOM: f64 = 1.1;
const BUBBLE_RADIUS: (f64, f64) = (5.0, 20.0);

impl Scales {
    pub fn from_points(points: &[AnimationPoint]) -> Option<Self> {
        let max_income = points.iter().map(|p| p.avg_income).reduce(f64::max)?;
        let max_illness = points.iter().map(|p| p.illness).reduce(f64::max)?;

        Some(Self {
            income: LogScale {
                domain: (MIN_INCOME, max_income * HEADROOM),
            },
            illness: LinearScale {
                domain: (0.0, max_illness * HEADROOM),
            },
            radius: SqrtScale {
                domain: (0.0, max_income),
                range: BUBBLE_RADIUS,
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationMode {
    Running,
    Paused,
}

/// Seconds each wave stays on screen while playing.
pub const WAVE_STEP_SECONDS: f64 = 1.0;
const MAX_FRAME_DELTA: f64 = 0.25;

/// Walks the wave timeline, one step per [`WAVE_STEP_SECONDS`] while
/// running, wrapping at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct WavePlayer {
    index: usize,
    len: usize,
    mode: AnimationMode,
    elapsed: f64,
    last_tick: Option<f64>,
}

impl WavePlayer {
    pub const fn new(len: usize) -> Self {
        Self {
            index: 0,
            len,
            mode: AnimationMode::Paused,
            elapsed: 0.0,
            last_tick: None,
        }
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    pub const fn mode(&self) -> AnimationMode {
        self.mode
    }

    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.index = self.index.min(len.saturating_sub(1));
    }

    pub fn toggle(&mut self) {
        self.mode = match self.mode {
            AnimationMode::Running => AnimationMode::Paused,
            AnimationMode::Paused => AnimationMode::Running,
        };
        self.elapsed = 0.0;
    }

    /// Moves the slider; out-of-range positions clamp to the last wave.
    pub fn seek(&mut self, index: usize) {
        self.index = index.min(self.len.saturating_sub(1));
        self.elapsed = 0.0;
    }

    pub fn step_forward(&mut self) {
        if self.len > 0 {
            self.seek((self.index + 1) % self.len);
        }
    }

    pub fn step_back(&mut self) {
        if self.len > 0 {
            self.seek((self.index + self.len - 1) % self.len);
        }
    }

    pub fn tick(&mut self, now_seconds: f64) {
        let (index, elapsed, last_tick) = advance_wave_index(
            self.index,
            self.len,
            self.elapsed,
            self.last_tick,
            now_seconds,
            self.mode,
        );
        self.index = index;
        self.elapsed = elapsed;
        self.last_tick = last_tick;
    }
}

pub fn advance_wave_index(
    index: usize,
    len: usize,
    elapsed: f64,
    last_tick: Option<f64>,
    now_seconds: f64,
    mode: AnimationMode,
) -> (usize, f64, Option<f64>) {
    let delta = last_tick
        .map(|last| (now_seconds - last).max(0.0).min(MAX_FRAME_DELTA))
        .unwrap_or(0.0);

    if mode == AnimationMode::Paused || len == 0 {
        return (index, elapsed, Some(now_seconds));
    }

    let mut index = index;
    let mut elapsed = elapsed + delta;
    while elapsed >= WAVE_STEP_SECONDS {
        elapsed -= WAVE_STEP_SECONDS;
        index = (index + 1) % len;
    }

    (index, elapsed, Some(now_seconds))
}
