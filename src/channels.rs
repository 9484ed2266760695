//! Channel rotation: a looping lineup of video sources. Each switch raises
//! the snow layer, waits out the static, then tunes to the next source.

use std::time::Duration;

use serde::Deserialize;

use crate::error::OverlayError;

/// How long a channel stays on air once loaded.
pub const DEFAULT_DWELL: Duration = Duration::from_secs(20);
/// How long the snow covers a switch.
pub const DEFAULT_SNOW: Duration = Duration::from_secs(2);

/// `data-channels` payload: `{"sources": [...], "dwellMs": 20000, "snowMs": 2000}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChannelOptions {
    pub sources: Vec<String>,
    pub dwell_ms: Option<u32>,
    pub snow_ms: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchPhase {
    OnAir,
    /// Snow is up; the next source goes live when it clears.
    Snow,
}

#[derive(Debug, Clone)]
pub struct ChannelLineup {
    sources: Vec<String>,
    current: usize,
    dwell: Duration,
    snow: Duration,
    phase: SwitchPhase,
}

impl ChannelLineup {
    pub fn new(sources: Vec<String>, dwell: Duration, snow: Duration) -> Result<Self, OverlayError> {
        if sources.is_empty() {
            return Err(OverlayError::InvalidConfig("channel lineup is empty".into()));
        }
        if let Some(i) = sources.iter().position(|s| s.trim().is_empty()) {
            return Err(OverlayError::InvalidConfig(format!("channel {i} has no source")));
        }
        for (name, d) in [("dwellMs", dwell), ("snowMs", snow)] {
            if d.as_millis() > i32::MAX as u128 {
                return Err(OverlayError::InvalidConfig(format!("{name} exceeds i32::MAX ms")));
            }
        }
        Ok(Self { sources, current: 0, dwell, snow, phase: SwitchPhase::OnAir })
    }

    pub fn from_options(options: &ChannelOptions) -> Result<Self, OverlayError> {
        let ms = |v: Option<u32>, default: Duration| v.map_or(default, |v| Duration::from_millis(v.into()));
        Self::new(
            options.sources.clone(),
            ms(options.dwell_ms, DEFAULT_DWELL),
            ms(options.snow_ms, DEFAULT_SNOW),
        )
    }

    pub fn from_json(json: &str) -> Result<Self, OverlayError> {
        let options: ChannelOptions =
            serde_json::from_str(json).map_err(|e| OverlayError::InvalidConfig(e.to_string()))?;
        Self::from_options(&options)
    }

    pub fn current(&self) -> &str {
        &self.sources[self.current]
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn phase(&self) -> SwitchPhase {
        self.phase
    }

    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    /// Dwell time is up: raise the snow. Returns how long it stays up, or
    /// `None` when a switch is already underway.
    pub fn begin_switch(&mut self) -> Option<Duration> {
        match self.phase {
            SwitchPhase::Snow => None,
            SwitchPhase::OnAir => {
                self.phase = SwitchPhase::Snow;
                Some(self.snow)
            }
        }
    }

    /// Snow has run its course: tune to the next source (wrapping) and
    /// return it. `None` if no switch was underway.
    pub fn finish_switch(&mut self) -> Option<&str> {
        if self.phase != SwitchPhase::Snow {
            return None;
        }
        self.phase = SwitchPhase::OnAir;
        self.current = (self.current + 1) % self.sources.len();
        Some(self.current())
    }
}
