//! Built-in starter profiles

use alloc::string::String;
use alloc::vec;

use super::types::{Profile, ProfileMeta, SafetyLimits, Segment};

impl Profile {
    /// Lead-free SAC305 starter profile
    ///
    /// Preheat to 150°C, soak, ramp through liquidus (217°C) to a 245°C
    /// peak, dwell, then cool to 50°C.
    pub fn sac305() -> Self {
        Self {
            meta: ProfileMeta {
                name: String::from("SAC305 Default"),
                description: String::from("Lead-free SAC305 reference profile"),
                ..Default::default()
            },
            safety: SafetyLimits {
                max_temp_c: 255.0,
                max_slope_c_per_s: 3.0,
                ..Default::default()
            },
            segments: vec![
                Segment::ramp(150.0, 1.5).with_note("Preheat"),
                Segment::hold(150.0, 90.0).with_note("Soak"),
                Segment::ramp(217.0, 2.5).with_note("To Reflow"),
                Segment::ramp(245.0, 1.0).with_note("Peak"),
                Segment::hold(245.0, 20.0).with_note("Liquid"),
                Segment::ramp(50.0, -2.0).with_note("Cool"),
            ],
        }
    }
}
