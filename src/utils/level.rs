use std::{fmt::Display, ops::Deref, str::FromStr};

use anyhow::anyhow;

/// Energy level reported by the user. Negative values mean drained, positive values mean
/// energized.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Energy(f64);

/// How absorbed the user was in the activity, from 0 to 1.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Engagement(f64);

impl Energy {
    pub const MIN: f64 = -1.;
    pub const MAX: f64 = 1.;

    pub fn new_opt(value: f64) -> Option<Energy> {
        in_range(value, Self::MIN, Self::MAX).then_some(Energy(value))
    }
}

impl Engagement {
    pub const MIN: f64 = 0.;
    pub const MAX: f64 = 1.;

    pub fn new_opt(value: f64) -> Option<Engagement> {
        in_range(value, Self::MIN, Self::MAX).then_some(Engagement(value))
    }
}

fn in_range(value: f64, min: f64, max: f64) -> bool {
    // NaN fails both comparisons
    value >= min && value <= max
}

impl FromStr for Energy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v = s.trim().parse::<f64>()?;
        Energy::new_opt(v).ok_or_else(|| {
            anyhow!("Energy {s} is outside of [{}, {}]", Self::MIN, Self::MAX)
        })
    }
}

impl FromStr for Engagement {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v = s.trim().parse::<f64>()?;
        Engagement::new_opt(v).ok_or_else(|| {
            anyhow!("Engagement {s} is outside of [{}, {}]", Self::MIN, Self::MAX)
        })
    }
}

impl Display for Energy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for Engagement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for Energy {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Deref for Engagement {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
