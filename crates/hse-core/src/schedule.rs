//! # Daily Time-Slot Grid
//!
//! The school day is divided into eight fixed slots: four morning hours
//! (08h00–12h00) and four afternoon hours (13h30–17h30). A declared
//! session occupies exactly one slot on one date; free-form start/end
//! times are not representable.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One of the eight fixed teaching slots of a school day.
///
/// `M1`–`M4` are the morning hours, `A1`–`A4` the afternoon hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeSlot {
    /// 08h00 – 09h00
    M1,
    /// 09h00 – 10h00
    M2,
    /// 10h00 – 11h00
    M3,
    /// 11h00 – 12h00
    M4,
    /// 13h30 – 14h30
    A1,
    /// 14h30 – 15h30
    A2,
    /// 15h30 – 16h30
    A3,
    /// 16h30 – 17h30
    A4,
}

/// Number of slots in a school day.
pub const TIME_SLOT_COUNT: usize = 8;

impl TimeSlot {
    /// All slots in chronological order.
    pub const ALL: [TimeSlot; TIME_SLOT_COUNT] = [
        TimeSlot::M1,
        TimeSlot::M2,
        TimeSlot::M3,
        TimeSlot::M4,
        TimeSlot::A1,
        TimeSlot::A2,
        TimeSlot::A3,
        TimeSlot::A4,
    ];

    /// Canonical wire name (`"M1"` … `"A4"`), matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::M1 => "M1",
            TimeSlot::M2 => "M2",
            TimeSlot::M3 => "M3",
            TimeSlot::M4 => "M4",
            TimeSlot::A1 => "A1",
            TimeSlot::A2 => "A2",
            TimeSlot::A3 => "A3",
            TimeSlot::A4 => "A4",
        }
    }

    /// Human-readable hour range, as printed on declaration forms.
    pub fn label(&self) -> &'static str {
        match self {
            TimeSlot::M1 => "08h00 – 09h00",
            TimeSlot::M2 => "09h00 – 10h00",
            TimeSlot::M3 => "10h00 – 11h00",
            TimeSlot::M4 => "11h00 – 12h00",
            TimeSlot::A1 => "13h30 – 14h30",
            TimeSlot::A2 => "14h30 – 15h30",
            TimeSlot::A3 => "15h30 – 16h30",
            TimeSlot::A4 => "16h30 – 17h30",
        }
    }

    /// Whether this slot falls before the lunch break.
    pub fn is_morning(&self) -> bool {
        matches!(self, TimeSlot::M1 | TimeSlot::M2 | TimeSlot::M3 | TimeSlot::M4)
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimeSlot {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "M1" => Ok(TimeSlot::M1),
            "M2" => Ok(TimeSlot::M2),
            "M3" => Ok(TimeSlot::M3),
            "M4" => Ok(TimeSlot::M4),
            "A1" => Ok(TimeSlot::A1),
            "A2" => Ok(TimeSlot::A2),
            "A3" => Ok(TimeSlot::A3),
            "A4" => Ok(TimeSlot::A4),
            other => Err(CoreError::InvalidTimeSlot(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_eight_slots_four_morning() {
        assert_eq!(TimeSlot::ALL.len(), 8);
        let morning = TimeSlot::ALL.iter().filter(|s| s.is_morning()).count();
        assert_eq!(morning, 4);
    }

    #[test]
    fn test_chronological_order() {
        assert!(TimeSlot::M1 < TimeSlot::M4);
        assert!(TimeSlot::M4 < TimeSlot::A1);
        assert!(TimeSlot::A1 < TimeSlot::A4);
    }

    #[test]
    fn test_from_str_roundtrip() {
        for slot in TimeSlot::ALL {
            assert_eq!(TimeSlot::from_str(slot.as_str()).unwrap(), slot);
        }
        assert!(TimeSlot::from_str("M5").is_err());
        assert!(TimeSlot::from_str("").is_err());
    }

    #[test]
    fn test_serde_uses_variant_name() {
        let json = serde_json::to_string(&TimeSlot::A3).unwrap();
        assert_eq!(json, "\"A3\"");
        let parsed: TimeSlot = serde_json::from_str("\"M2\"").unwrap();
        assert_eq!(parsed, TimeSlot::M2);
    }

    #[test]
    fn test_labels_are_hour_ranges() {
        assert_eq!(TimeSlot::M1.label(), "08h00 – 09h00");
        assert_eq!(TimeSlot::A4.label(), "16h30 – 17h30");
    }
}
