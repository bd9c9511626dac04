//! Patient profile and vital-sign types.
//!
//! Everything here arrives from form fields, voice capture, or a wearable
//! simulator, so the string-encoded values are parsed defensively: a garbled
//! age reads as 0 and a garbled blood pressure reads as absent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// ABO/Rh blood group as captured on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        BloodGroup::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == wanted)
            .ok_or_else(|| format!("unknown blood group '{}'", s.trim()))
    }
}

/// Demographics captured at intake. Immutable for the life of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    /// String-encoded integer straight from the form; may be empty or garbled.
    pub age: String,
    pub gender: String,
    /// "SYS/DIA" as typed on the profile screen.
    pub blood_pressure: String,
    pub blood_group: BloodGroup,
}

impl PatientProfile {
    /// Age in whole years. Anything that is not a non-negative integer reads as 0.
    pub fn age_years(&self) -> u32 {
        self.age.trim().parse::<u32>().unwrap_or(0)
    }
}

/// One reading from the vitals provider (manual entry or wearable simulation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    pub heart_rate: u32,
    /// "SYS/DIA"; takes precedence over the profile reading when it parses.
    pub blood_pressure: String,
    pub spo2: u32,
}

/// A parsed systolic/diastolic pair in mmHg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: u32,
    pub diastolic: u32,
}

impl BloodPressure {
    /// Parse a "SYS/DIA" reading.
    ///
    /// Surrounding whitespace and a trailing "mmHg" unit are tolerated.
    /// Anything else that is not exactly two '/'-separated integers yields
    /// `None`, never a panic.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut text = raw.trim();
        if let Some(unit_start) = text.len().checked_sub(4) {
            if text
                .get(unit_start..)
                .is_some_and(|unit| unit.eq_ignore_ascii_case("mmhg"))
            {
                text = text[..unit_start].trim_end();
            }
        }

        let (sys, dia) = text.split_once('/')?;
        let systolic = sys.trim().parse::<u32>().ok()?;
        let diastolic = dia.trim().parse::<u32>().ok()?;
        Some(Self { systolic, diastolic })
    }
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}
