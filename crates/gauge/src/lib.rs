//! RPM shift-light gauge: 16 segments banded green, red, then aqua.
//!
//! The gauge only reacts once the engine is at or above half of max RPM. Below
//! that the previous colors stay on screen, and past max RPM every segment goes
//! dark.

use serde::{Deserialize, Serialize};

pub const SEGMENT_COUNT: usize = 16;

const GREEN_END: usize = 5;
const RED_END: usize = 11;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub enum SegmentColor {
    #[default]
    Off,
    Green,
    Red,
    Aqua,
}

impl SegmentColor {
    pub fn is_lit(self) -> bool {
        self != SegmentColor::Off
    }

    fn for_index(i: usize) -> Self {
        match i {
            i if i < GREEN_END => SegmentColor::Green,
            i if i < RED_END => SegmentColor::Red,
            _ => SegmentColor::Aqua,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct RpmGauge {
    pub segments: [SegmentColor; SEGMENT_COUNT],
}

impl RpmGauge {
    pub fn lit_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_lit()).count()
    }
}

/// Outcome of feeding one RPM reading to the gauge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GaugeUpdate {
    /// Max RPM has not been reported yet (or is not positive); nothing to divide by.
    NoMaxRpm,
    /// Below half of max RPM, the gauge keeps whatever it showed before.
    BelowHalf,
    Segments(RpmGauge),
}

pub fn evaluate(current_rpm: i32, max_rpm: i32) -> GaugeUpdate {
    if max_rpm <= 0 {
        return GaugeUpdate::NoMaxRpm;
    }
    let percent_filled = current_rpm as f32 / max_rpm as f32;
    if percent_filled < 0.5 {
        return GaugeUpdate::BelowHalf;
    }

    // integer half, so an odd max RPM puts max itself slightly over 1.0
    let half_max = max_rpm / 2;
    let adjusted = (current_rpm - half_max) as f32 / half_max as f32;

    let mut gauge = RpmGauge::default();
    let mut i = 0;
    while i < SEGMENT_COUNT && (i as f32 / SEGMENT_COUNT as f32) < adjusted && adjusted <= 1.0 {
        gauge.segments[i] = SegmentColor::for_index(i);
        i += 1;
    }
    // segments from i onward stay Off; over-rev never enters the loop above
    GaugeUpdate::Segments(gauge)
}

/// Next gauge state for an RPM reading. Skipped updates return `previous` untouched.
pub fn update(current_rpm: i32, max_rpm: i32, previous: &RpmGauge) -> RpmGauge {
    match evaluate(current_rpm, max_rpm) {
        GaugeUpdate::Segments(g) => g,
        GaugeUpdate::NoMaxRpm | GaugeUpdate::BelowHalf => *previous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SegmentColor::*;

    fn segments(update: GaugeUpdate) -> [SegmentColor; SEGMENT_COUNT] {
        match update {
            GaugeUpdate::Segments(g) => g.segments,
            other => panic!("expected segments, got {:?}", other),
        }
    }

    #[test]
    fn skips_without_max_rpm() {
        assert_eq!(evaluate(5000, 0), GaugeUpdate::NoMaxRpm);
        assert_eq!(evaluate(5000, -8000), GaugeUpdate::NoMaxRpm);
    }

    #[test]
    fn skips_below_half() {
        assert_eq!(evaluate(2400, 8000), GaugeUpdate::BelowHalf);
        assert_eq!(evaluate(3999, 8000), GaugeUpdate::BelowHalf);
        assert_eq!(evaluate(-100, 8000), GaugeUpdate::BelowHalf);
    }

    #[test]
    fn three_quarters_lights_eight_segments() {
        let s = segments(evaluate(6000, 8000));
        assert_eq!(&s[..5], &[Green; 5]);
        assert_eq!(&s[5..8], &[Red; 3]);
        assert_eq!(&s[8..], &[Off; 8]);
    }

    #[test]
    fn max_rpm_lights_every_band() {
        let s = segments(evaluate(8000, 8000));
        assert_eq!(&s[..5], &[Green; 5]);
        assert_eq!(&s[5..11], &[Red; 6]);
        assert_eq!(&s[11..], &[Aqua; 5]);
    }

    #[test]
    fn over_rev_blanks_everything() {
        assert_eq!(segments(evaluate(8001, 8000)), [Off; SEGMENT_COUNT]);
        assert_eq!(segments(evaluate(12000, 8000)), [Off; SEGMENT_COUNT]);
    }

    #[test]
    fn exactly_half_is_an_update_with_nothing_lit() {
        assert_eq!(segments(evaluate(4000, 8000)), [Off; SEGMENT_COUNT]);
        let s = segments(evaluate(4001, 8000));
        assert_eq!(s[0], Green);
        assert_eq!(&s[1..], &[Off; 15]);
    }

    #[test]
    fn odd_max_rpm_overshoots_at_redline() {
        // half of 7001 is 3500, so 7001 maps to 3501/3500
        assert_eq!(segments(evaluate(7001, 7001)), [Off; SEGMENT_COUNT]);
        assert_eq!(segments(evaluate(7000, 7001)).iter().filter(|s| s.is_lit()).count(), 16);
    }

    #[test]
    fn tiny_max_rpm_does_not_fault() {
        assert_eq!(segments(evaluate(1, 1)), [Off; SEGMENT_COUNT]);
    }

    #[test]
    fn skipped_updates_keep_previous_segments() {
        let lit = update(7000, 8000, &RpmGauge::default());
        assert_eq!(lit.lit_count(), 12);
        assert_eq!(update(1000, 8000, &lit), lit);
        assert_eq!(update(7000, 0, &lit), lit);
        assert_eq!(update(9000, 8000, &lit).lit_count(), 0);
    }

    #[test]
    fn serializes_as_color_names() {
        let v = serde_json::to_value(RpmGauge::default()).unwrap();
        assert_eq!(v["segments"].as_array().unwrap().len(), SEGMENT_COUNT);
        assert_eq!(v["segments"][0], "Off");
    }
}
