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

use crate::num::CapacityNumeric;

/// Scores a selection by its capacity overshoot and its worst rating.
///
/// For a selection with total capacity `c`, needed volume `v` and worst
/// rating `r` the cost is `alpha * c / v + r`, or `+inf` if `c < v`.
/// The overshoot term is at least `alpha` for every feasible selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    alpha: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl CostModel {
    #[inline]
    pub const fn new(alpha: f64) -> Self {
        Self { alpha }
    }

    /// Returns the weight of the overshoot term.
    #[inline]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns the cost of a selection, `f64::INFINITY` if it is infeasible.
    ///
    /// `needed_volume` must be positive.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use offboard_search::cost::CostModel;
    ///
    /// let model = CostModel::default();
    /// assert_eq!(model.cost(10u64, 10, 0.5), 1.5);
    /// assert_eq!(model.cost(9u64, 10, 0.5), f64::INFINITY);
    /// ```
    #[inline]
    pub fn cost<C>(&self, total_capacity: C, needed_volume: C, worst_rating: f64) -> f64
    where
        C: CapacityNumeric,
    {
        debug_assert!(
            !needed_volume.is_zero(),
            "called `CostModel::cost` with a zero needed volume"
        );

        if total_capacity < needed_volume {
            return f64::INFINITY;
        }
        self.lower_bound(total_capacity, needed_volume, worst_rating)
    }

    /// Returns the cost expression without the feasibility check.
    ///
    /// Adding devices never lowers the capacity nor the worst rating,
    /// so this bounds the cost of every completion of a partial selection.
    #[inline]
    pub fn lower_bound<C>(&self, accumulated_capacity: C, needed_volume: C, worst_rating: f64) -> f64
    where
        C: CapacityNumeric,
    {
        let accumulated = accumulated_capacity.to_f64().unwrap_or(f64::INFINITY);
        let needed = needed_volume.to_f64().unwrap_or(f64::INFINITY);
        self.alpha * accumulated / needed + worst_rating
    }
}

impl std::fmt::Display for CostModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CostModel(alpha: {})", self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::CostModel;

    #[test]
    fn test_infeasible_is_infinite() {
        let model = CostModel::default();
        assert_eq!(model.cost(2u64, 10, 0.1), f64::INFINITY);
        assert_eq!(model.cost(0u32, 1, f64::NEG_INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_exact_fit() {
        let model = CostModel::default();
        assert_eq!(model.cost(10u64, 10, 0.5), 1.5);
    }

    #[test]
    fn test_overshoot_is_penalized() {
        let model = CostModel::default();
        assert_eq!(model.cost(15u64, 10, 0.5), 2.0);
        assert!(model.cost(15u64, 10, 0.5) > model.cost(10u64, 10, 0.5));
    }

    #[test]
    fn test_alpha_weights_overshoot() {
        let model = CostModel::new(2.0);
        assert_eq!(model.alpha(), 2.0);
        assert_eq!(model.cost(20usize, 10, 0.25), 4.25);
    }

    #[test]
    fn test_lower_bound_ignores_feasibility() {
        let model = CostModel::default();
        assert!((model.lower_bound(5u64, 10, 0.1) - 0.6).abs() < 1e-12);
        assert_eq!(model.lower_bound(0u64, 10, f64::NEG_INFINITY), f64::NEG_INFINITY);
    }

    #[test]
    fn test_lower_bound_is_monotone() {
        let model = CostModel::default();
        let bound = model.lower_bound(3u64, 10, 0.2);
        assert!(model.lower_bound(6u64, 10, 0.2) >= bound);
        assert!(model.lower_bound(3u64, 10, 0.7) >= bound);
        assert!(model.cost(12u64, 10, 0.7) >= bound);
    }
}
