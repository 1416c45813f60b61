//! Playback synchronizer
//!
//! Keeps transcript-line highlighting and the seek bar consistent with
//! actual playback time. The selection logic is pure so it can be tested
//! without any real audio engine; `PlaybackSync` owns the single playback
//! position source of truth.

use crate::session::TranscriptLine;

/// Index of the line considered "current" at `position_secs`: the line whose
/// timestamp is <= position and whose successor's timestamp is > position.
/// The last line's effective end is unbounded. Linear scan over ordered
/// timestamps, re-run on every playback-time notification.
pub fn current_line(lines: &[TranscriptLine], position_secs: f64) -> Option<usize> {
    let mut current = None;
    for (i, line) in lines.iter().enumerate() {
        if (line.offset_secs as f64) <= position_secs {
            current = Some(i);
        } else {
            break;
        }
    }
    current
}

/// Map a click on the progress surface to a playback position:
/// `(click_x / surface_width) * duration`, clamped. No interpolation.
pub fn seek_target(click_x: f64, surface_width: f64, duration_secs: f64) -> f64 {
    if surface_width <= 0.0 || duration_secs <= 0.0 {
        return 0.0;
    }
    let fraction = (click_x / surface_width).clamp(0.0, 1.0);
    fraction * duration_secs
}

/// m:ss display format for timers
pub fn format_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Owns playback position and the transcript lines for one recording.
#[derive(Debug, Clone)]
pub struct PlaybackSync {
    lines: Vec<TranscriptLine>,
    duration_secs: f64,
    position_secs: f64,
}

impl PlaybackSync {
    pub fn new(lines: Vec<TranscriptLine>, duration_secs: f64) -> Self {
        Self {
            lines,
            duration_secs,
            position_secs: 0.0,
        }
    }

    pub fn position_secs(&self) -> f64 {
        self.position_secs
    }

    /// Assign the playback position directly (user-driven scrub).
    pub fn seek(&mut self, position_secs: f64) -> Option<usize> {
        self.position_secs = position_secs.clamp(0.0, self.duration_secs);
        self.current_line()
    }

    /// Handle a playback-time-changed notification (natural advance).
    pub fn advance(&mut self, position_secs: f64) -> Option<usize> {
        self.position_secs = position_secs;
        self.current_line()
    }

    /// Handle a click on the progress surface.
    pub fn seek_click(&mut self, click_x: f64, surface_width: f64) -> Option<usize> {
        let target = seek_target(click_x, surface_width, self.duration_secs);
        self.seek(target)
    }

    pub fn current_line(&self) -> Option<usize> {
        current_line(&self.lines, self.position_secs)
    }
}
