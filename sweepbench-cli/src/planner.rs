//! Suite Planner
//!
//! Selects the suites to run by matching their names against the filter
//! regex. Registration order is kept.

use crate::Suite;
use regex::Regex;

/// Suites selected for one invocation
pub struct ExecutionPlan<'a> {
    /// Selected suites, in registration order
    pub suites: Vec<&'a Suite>,
}

impl ExecutionPlan<'_> {
    /// Total number of parameter points across the plan, if every grid is finite
    pub fn total_points(&self) -> Option<usize> {
        self.suites
            .iter()
            .try_fold(0usize, |acc, s| acc.checked_add(s.point_count()?))
    }
}

/// Build the execution plan from registered suites
pub fn build_plan<'a>(suites: &'a [Suite], filter: Option<&Regex>) -> ExecutionPlan<'a> {
    let selected = suites
        .iter()
        .filter(|s| filter.is_none_or(|re| re.is_match(&s.name)))
        .collect();

    ExecutionPlan { suites: selected }
}
