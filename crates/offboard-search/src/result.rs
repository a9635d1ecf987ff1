// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::{cost::CostModel, num::CapacityNumeric, stats::SolverStatistics};
use offboard_model::{index::DeviceIndex, instance::Instance};

/// A scored subset of the device pool.
///
/// An infinite cost marks an infeasible result; such a result never carries
/// a selection. The selected indices are kept in ascending order so that
/// equal selections compare equal regardless of how they were found.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateResult {
    cost: f64,
    selected: Vec<DeviceIndex>,
}

impl CandidateResult {
    /// Creates a result from a cost and the selected devices.
    #[inline]
    pub fn new(cost: f64, mut selected: Vec<DeviceIndex>) -> Self {
        if !cost.is_finite() {
            return Self::infeasible();
        }
        selected.sort_unstable();
        Self { cost, selected }
    }

    /// Returns the infeasible sentinel: infinite cost, nothing selected.
    #[inline]
    pub fn infeasible() -> Self {
        Self {
            cost: f64::INFINITY,
            selected: Vec::new(),
        }
    }

    /// Scores `selected` against the exact capacities and ratings of `instance`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use offboard_model::{index::DeviceIndex, instance::InstanceBuilder};
    /// # use offboard_search::{cost::CostModel, result::CandidateResult};
    ///
    /// let mut builder = InstanceBuilder::<u64>::new(10);
    /// let a = builder.add_device(0.1, 5);
    /// let b = builder.add_device(0.5, 5);
    /// let instance = builder.build().unwrap();
    ///
    /// let result = CandidateResult::score(&instance, &CostModel::default(), vec![b, a]);
    /// assert_eq!(result.cost(), 1.5);
    /// assert_eq!(result.selected(), &[a, b]);
    /// ```
    pub fn score<T>(instance: &Instance<T>, cost_model: &CostModel, selected: Vec<DeviceIndex>) -> Self
    where
        T: CapacityNumeric,
    {
        let cost = cost_model.cost(
            instance.capacity_of(&selected),
            instance.needed_volume(),
            instance.worst_rating_of(&selected),
        );
        Self::new(cost, selected)
    }

    /// Returns the cost, `f64::INFINITY` if infeasible.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Returns the selected devices in ascending index order.
    #[inline]
    pub fn selected(&self) -> &[DeviceIndex] {
        &self.selected
    }

    /// Consumes the result and returns the selected devices.
    #[inline]
    pub fn into_selected(self) -> Vec<DeviceIndex> {
        self.selected
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.cost.is_finite()
    }

    /// Returns the cheaper of `self` and `other`; ties keep `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use offboard_model::index::DeviceIndex;
    /// # use offboard_search::result::CandidateResult;
    ///
    /// let a = CandidateResult::new(1.5, vec![DeviceIndex::new(0)]);
    /// let b = CandidateResult::new(1.5, vec![DeviceIndex::new(1)]);
    /// assert_eq!(a.clone().unite(b), a);
    /// ```
    #[inline]
    pub fn unite(self, other: Self) -> Self {
        if other.cost < self.cost { other } else { self }
    }
}

impl Default for CandidateResult {
    fn default() -> Self {
        Self::infeasible()
    }
}

impl std::fmt::Display for CandidateResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.is_feasible() {
            return write!(f, "Infeasible");
        }
        write!(f, "CandidateResult(cost: {:.6}, devices: [", self.cost)?;
        for (i, index) in self.selected.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", index.get())?;
        }
        write!(f, "])")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The search enumerated every selection that could improve the result.
    OptimalityProven,
    /// The search enumerated every selection and none reaches the needed volume.
    InfeasibilityProven,
    /// A heuristic ran to completion; its result carries no optimality proof.
    HeuristicCompleted,
    /// The search was stopped by a monitor. The string holds the reason.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            TerminationReason::HeuristicCompleted => write!(f, "Heuristic Completed"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// What a strategy reports back to the optimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyOutcome {
    result: CandidateResult,
    reason: TerminationReason,
    statistics: SolverStatistics,
}

impl StrategyOutcome {
    #[inline]
    pub fn new(
        result: CandidateResult,
        reason: TerminationReason,
        statistics: SolverStatistics,
    ) -> Self {
        Self {
            result,
            reason,
            statistics,
        }
    }

    #[inline]
    pub fn result(&self) -> &CandidateResult {
        &self.result
    }

    #[inline]
    pub fn into_result(self) -> CandidateResult {
        self.result
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.reason
    }

    #[inline]
    pub fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self.reason, TerminationReason::OptimalityProven)
    }
}

impl std::fmt::Display for StrategyOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StrategyOutcome(result: {}, reason: {})",
            self.result, self.reason
        )
    }
}
