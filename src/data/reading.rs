//! Vital-sign readings and their validation.
//!
//! The on-disk record format is one reading per line:
//!
//! ```text
//! heartRate,bloodPressure,spo2
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Accepted heart rate range, beats per minute.
pub const HEART_RATE_RANGE: (i32, i32) = (30, 200);
/// Accepted blood pressure range, mmHg.
pub const BLOOD_PRESSURE_RANGE: (i32, i32) = (60, 250);
/// Accepted oxygen saturation range, percent.
pub const SPO2_RANGE: (i32, i32) = (70, 100);

/// The three measured vital signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalSign {
    HeartRate,
    BloodPressure,
    Spo2,
}

impl VitalSign {
    /// Inclusive bounds a valid reading must respect.
    pub fn range(&self) -> (i32, i32) {
        match self {
            VitalSign::HeartRate => HEART_RATE_RANGE,
            VitalSign::BloodPressure => BLOOD_PRESSURE_RANGE,
            VitalSign::Spo2 => SPO2_RANGE,
        }
    }
}

impl fmt::Display for VitalSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VitalSign::HeartRate => write!(f, "heart rate"),
            VitalSign::BloodPressure => write!(f, "blood pressure"),
            VitalSign::Spo2 => write!(f, "SpO2"),
        }
    }
}

/// A validated vital-sign reading.
///
/// Values are only constructible through [`Reading::new`] or parsing, so
/// every `Reading` in a queue or heap is within physiological bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Reading {
    heart_rate: i32,
    blood_pressure: i32,
    spo2: i32,
}

impl Reading {
    /// Validate raw values into a reading.
    pub fn new(heart_rate: i32, blood_pressure: i32, spo2: i32) -> Result<Self> {
        check(VitalSign::HeartRate, heart_rate)?;
        check(VitalSign::BloodPressure, blood_pressure)?;
        check(VitalSign::Spo2, spo2)?;
        Ok(Self {
            heart_rate,
            blood_pressure,
            spo2,
        })
    }

    /// Parse and validate a `heartRate,bloodPressure,spo2` record.
    ///
    /// Only the first three fields are read; anything after them is ignored.
    pub fn parse(record: &str) -> Result<Self> {
        let fields: Vec<&str> = record.trim().split(',').map(str::trim).collect();
        if fields.len() < 3 {
            return Err(Error::Parse(format!(
                "expected 3 comma-separated fields, found {}",
                fields.len()
            )));
        }

        let mut values = [0i32; 3];
        for (slot, field) in values.iter_mut().zip(&fields) {
            *slot = field
                .parse()
                .map_err(|_| Error::Parse(format!("'{}' is not an integer", field)))?;
        }

        Self::new(values[0], values[1], values[2])
    }

    pub fn heart_rate(&self) -> i32 {
        self.heart_rate
    }

    pub fn blood_pressure(&self) -> i32 {
        self.blood_pressure
    }

    pub fn spo2(&self) -> i32 {
        self.spo2
    }
}

fn check(sign: VitalSign, value: i32) -> Result<()> {
    let (min, max) = sign.range();
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::OutOfRange {
            sign,
            value,
            min,
            max,
        })
    }
}

impl FromStr for Reading {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HR: {} bpm | BP: {} mmHg | SpO2: {}%",
            self.heart_rate, self.blood_pressure, self.spo2
        )
    }
}
