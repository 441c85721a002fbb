//! Profile execution scheduler
//!
//! Tracks elapsed time through a compiled profile and provides the heater
//! setpoint the oven's temperature controller should track. Generates events
//! when the active segment changes and when the profile finishes.

use super::compile::CompiledProfile;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scheduler execution phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExecutionPhase {
    /// Not running
    Idle,
    /// Following the trajectory
    Running,
    /// Paused by user; elapsed time frozen
    Paused,
    /// Trajectory finished, heater off for cooldown
    Complete,
}

/// Events emitted while running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Segment with this index became active
    SegmentStarted(u8),
    /// End of the trajectory reached
    ProfileFinished,
}

/// Current heater command from scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeaterCommand {
    /// Target temperature in °C × 10 (None = heater off)
    pub target_temp_x10: Option<i16>,
}

impl HeaterCommand {
    /// Create an off command
    pub const fn off() -> Self {
        Self {
            target_temp_x10: None,
        }
    }

    /// Create a heating command
    pub const fn heating(temp_x10: i16) -> Self {
        Self {
            target_temp_x10: Some(temp_x10),
        }
    }

    /// Target temperature in °C
    pub fn target_temp_c(&self) -> Option<f32> {
        self.target_temp_x10.map(|t| t as f32 / 10.0)
    }
}

/// Profile scheduler
///
/// Owns a copy of the compiled profile for the duration of a run.
#[derive(Debug)]
pub struct Scheduler {
    /// Current execution phase
    phase: ExecutionPhase,
    /// Profile being executed
    profile: Option<CompiledProfile>,
    /// Elapsed time since start (ms), frozen while paused
    elapsed_ms: u32,
    /// Active segment index
    segment_index: Option<u8>,
    /// Heater command state
    heater_cmd: HeaterCommand,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Create a new scheduler
    pub const fn new() -> Self {
        Self {
            phase: ExecutionPhase::Idle,
            profile: None,
            elapsed_ms: 0,
            segment_index: None,
            heater_cmd: HeaterCommand::off(),
        }
    }

    /// Load the profile to execute
    ///
    /// Ignored while a run is in progress.
    pub fn load(&mut self, profile: CompiledProfile) -> bool {
        if matches!(self.phase, ExecutionPhase::Running | ExecutionPhase::Paused) {
            return false;
        }
        self.profile = Some(profile);
        self.phase = ExecutionPhase::Idle;
        true
    }

    /// Get current execution phase
    pub fn phase(&self) -> ExecutionPhase {
        self.phase
    }

    /// Get loaded profile
    pub fn profile(&self) -> Option<&CompiledProfile> {
        self.profile.as_ref()
    }

    /// Get current heater command
    pub fn heater_command(&self) -> HeaterCommand {
        if self.phase == ExecutionPhase::Running {
            self.heater_cmd
        } else {
            HeaterCommand::off()
        }
    }

    /// Get active segment index (if running or paused)
    pub fn segment_index(&self) -> Option<u8> {
        match self.phase {
            ExecutionPhase::Running | ExecutionPhase::Paused => self.segment_index,
            _ => None,
        }
    }

    /// Start executing the loaded profile from the beginning
    ///
    /// Returns the first event, or None if no profile is loaded or a run
    /// is already in progress.
    pub fn start(&mut self) -> Option<Event> {
        if matches!(self.phase, ExecutionPhase::Running | ExecutionPhase::Paused) {
            return None;
        }
        if self.profile.as_ref()?.waypoints.is_empty() {
            return None;
        }

        self.phase = ExecutionPhase::Running;
        self.elapsed_ms = 0;
        self.segment_index = None;
        self.update()
    }

    /// Update scheduler with elapsed time
    ///
    /// Call this periodically (e.g., every 100ms).
    /// Returns an event if a transition occurred.
    pub fn tick(&mut self, elapsed_ms: u32) -> Option<Event> {
        if self.phase != ExecutionPhase::Running {
            return None;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        self.update()
    }

    /// Recompute setpoint and active segment
    fn update(&mut self) -> Option<Event> {
        let profile = self.profile.as_ref()?;

        if self.elapsed_ms >= profile.duration_ms() {
            return self.finish();
        }

        if let Some(target) = profile.setpoint_at(self.elapsed_ms) {
            self.heater_cmd = HeaterCommand::heating(target);
        }

        let active = profile.segment_at(self.elapsed_ms).map(|i| i as u8);
        if active != self.segment_index {
            self.segment_index = active;
            if let Some(index) = active {
                return Some(Event::SegmentStarted(index));
            }
        }

        None
    }

    /// Handle trajectory completion
    fn finish(&mut self) -> Option<Event> {
        self.phase = ExecutionPhase::Complete;
        self.heater_cmd = HeaterCommand::off();
        self.segment_index = None;
        Some(Event::ProfileFinished)
    }

    /// Pause execution
    ///
    /// Heater is off while paused; the setpoint is kept for resume.
    pub fn pause(&mut self) -> bool {
        if self.phase == ExecutionPhase::Running {
            self.phase = ExecutionPhase::Paused;
            true
        } else {
            false
        }
    }

    /// Resume execution
    pub fn resume(&mut self) -> bool {
        if self.phase == ExecutionPhase::Paused {
            self.phase = ExecutionPhase::Running;
            true
        } else {
            false
        }
    }

    /// Abort execution
    ///
    /// The loaded profile is kept so it can be started again.
    pub fn abort(&mut self) {
        self.phase = ExecutionPhase::Idle;
        self.heater_cmd = HeaterCommand::off();
        self.elapsed_ms = 0;
        self.segment_index = None;
    }

    /// Get elapsed time for the current run (ms)
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// Get remaining time for the current run (ms)
    pub fn remaining_ms(&self) -> u32 {
        match (&self.profile, self.phase) {
            (Some(profile), ExecutionPhase::Running | ExecutionPhase::Paused) => {
                profile.duration_ms().saturating_sub(self.elapsed_ms)
            }
            _ => 0,
        }
    }
}
