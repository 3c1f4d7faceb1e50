//! Per-lab demand counts derived from stored choices.

use std::collections::HashMap;

use super::choice::Priority;
use super::lab::{Lab, LabId};

/// Number of students who ranked a lab at a given priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceTally {
    /// Ranked lab.
    pub lab_id: LabId,
    /// Rank position.
    pub priority: Priority,
    /// Number of students.
    pub count: u64,
}

/// Demand for a single lab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabDemand {
    lab: Lab,
    counts: PriorityCounts,
}

impl LabDemand {
    /// The lab these counts describe.
    #[must_use]
    pub fn lab(&self) -> &Lab {
        &self.lab
    }

    /// Students ranking this lab at `priority`.
    #[must_use]
    pub fn count(&self, priority: Priority) -> u64 {
        self.counts.get(priority)
    }
}

/// Demand across the whole catalogue, in catalogue order.
///
/// Every lab appears exactly once, including labs nobody chose.
///
/// # Examples
/// ```
/// use labrank::domain::{ChoiceTally, DemandReport, Lab, LabId, Priority};
///
/// let a = Lab::new(LabId::new(1).expect("id"), "A", None, None).expect("lab");
/// let tallies = [ChoiceTally { lab_id: a.id(), priority: Priority::Second, count: 2 }];
/// let report = DemandReport::build(vec![a], &tallies);
/// assert_eq!(report.rows()[0].count(Priority::Second), 2);
/// assert_eq!(report.rows()[0].count(Priority::First), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DemandReport {
    rows: Vec<LabDemand>,
}

impl DemandReport {
    /// Combine the ordered lab list with grouped tallies.
    ///
    /// Tallies for labs absent from `labs` are ignored; repeated tallies for
    /// the same lab and priority are summed.
    #[must_use]
    pub fn build(labs: Vec<Lab>, tallies: &[ChoiceTally]) -> Self {
        let mut counts: HashMap<LabId, PriorityCounts> = HashMap::with_capacity(labs.len());
        for tally in tallies {
            counts
                .entry(tally.lab_id)
                .or_default()
                .add(tally.priority, tally.count);
        }

        let rows = labs
            .into_iter()
            .map(|lab| {
                let counts = counts.get(&lab.id()).copied().unwrap_or_default();
                LabDemand { lab, counts }
            })
            .collect();
        Self { rows }
    }

    /// Rows in catalogue order.
    #[must_use]
    pub fn rows(&self) -> &[LabDemand] {
        &self.rows
    }

    /// Sum of counts at `priority` across all labs.
    ///
    /// Equals the number of students who have submitted choices.
    #[must_use]
    pub fn total(&self, priority: Priority) -> u64 {
        self.rows.iter().map(|row| row.count(priority)).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct PriorityCounts {
    first: u64,
    second: u64,
    third: u64,
}

impl PriorityCounts {
    const fn get(self, priority: Priority) -> u64 {
        match priority {
            Priority::First => self.first,
            Priority::Second => self.second,
            Priority::Third => self.third,
        }
    }

    fn add(&mut self, priority: Priority, count: u64) {
        let slot = match priority {
            Priority::First => &mut self.first,
            Priority::Second => &mut self.second,
            Priority::Third => &mut self.third,
        };
        *slot = slot.saturating_add(count);
    }
}
