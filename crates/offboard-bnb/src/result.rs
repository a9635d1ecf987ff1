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

use crate::stats::ExhaustiveStatistics;
use offboard_search::result::{CandidateResult, TerminationReason};

/// Result of the exhaustive search after termination.
#[derive(Debug, Clone, PartialEq)]
pub struct ExhaustiveOutcome {
    result: CandidateResult,
    termination_reason: TerminationReason,
    statistics: ExhaustiveStatistics,
}

impl ExhaustiveOutcome {
    /// The search completed; the result is optimal, or proven infeasible
    /// if it carries an infinite cost.
    #[inline]
    pub fn completed(result: CandidateResult, statistics: ExhaustiveStatistics) -> Self {
        let termination_reason = if result.is_feasible() {
            TerminationReason::OptimalityProven
        } else {
            TerminationReason::InfeasibilityProven
        };

        Self {
            result,
            termination_reason,
            statistics,
        }
    }

    #[inline]
    pub fn aborted<R>(result: CandidateResult, reason: R, statistics: ExhaustiveStatistics) -> Self
    where
        R: Into<String>,
    {
        Self {
            result,
            termination_reason: TerminationReason::Aborted(reason.into()),
            statistics,
        }
    }

    /// Returns the best selection found.
    #[inline]
    pub fn result(&self) -> &CandidateResult {
        &self.result
    }

    #[inline]
    pub fn into_result(self) -> CandidateResult {
        self.result
    }

    /// Returns the termination reason.
    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    /// Returns the search statistics.
    #[inline]
    pub fn statistics(&self) -> &ExhaustiveStatistics {
        &self.statistics
    }

    /// Splits the outcome into its parts.
    #[inline]
    pub fn into_parts(self) -> (CandidateResult, TerminationReason, ExhaustiveStatistics) {
        (self.result, self.termination_reason, self.statistics)
    }
}

impl std::fmt::Display for ExhaustiveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ExhaustiveOutcome(result: {}, termination_reason: {})",
            self.result, self.termination_reason
        )
    }
}
