//! Snapshot types shared by the manager, the API and the recorder.

use std::fmt;

use serde::Serialize;

use crate::sim::registry::RenewableSource;

/// Most recent draw of one household.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HouseholdReading {
    /// Household identifier.
    pub id: String,
    /// Amount granted in the household's latest cycle.
    #[serde(rename = "consumo")]
    pub consumption: u32,
}

/// Best-effort consistent view of the grid.
///
/// Pool counters and renewables are read together; household readings are
/// read separately and may be a cycle ahead or behind.
///
/// Serialises with the field names of the public state contract:
/// `energia_total`, `energia_disponible`, `hogares`, `renovables`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridSnapshot {
    /// Cumulative capacity ever granted.
    #[serde(rename = "energia_total")]
    pub total: u64,
    /// Currently unborrowed capacity.
    #[serde(rename = "energia_disponible")]
    pub available: u64,
    /// One entry per household of the current (or last) run.
    #[serde(rename = "hogares")]
    pub households: Vec<HouseholdReading>,
    /// Registered renewable sources in registration order.
    #[serde(rename = "renovables")]
    pub renewables: Vec<RenewableSource>,
}

impl GridSnapshot {
    /// Sum of the latest draw of every household.
    pub fn household_draw(&self) -> u64 {
        self.households
            .iter()
            .map(|h| u64::from(h.consumption))
            .sum()
    }

    /// Sum of all renewable capacities.
    pub fn renewable_capacity(&self) -> u64 {
        self.renewables
            .iter()
            .map(|r| u64::from(r.capacity))
            .sum()
    }

    /// Fraction of the total capacity currently available, in `[0, 1]`.
    pub fn headroom(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.available as f64 / self.total as f64
    }
}

impl fmt::Display for GridSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "available={}/{} households=[",
            self.available, self.total
        )?;
        for (i, h) in self.households.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}:{}", h.id, h.consumption)?;
        }
        write!(f, "] renewables={}", self.renewables.len())
    }
}
