/// Subtracted from a non-zero lower bound before matching.
pub const LOWER_SLACK: i64 = 2_000;
/// Added to the upper bound before matching.
pub const UPPER_SLACK: i64 = 5_000;

/// Inclusive price window derived from a stated budget, widened asymmetrically.
///
/// Query synthesis and ranking must both go through [`BudgetRange::widen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetRange {
	pub min: i64,
	pub max: i64,
}
impl BudgetRange {
	/// Returns `None` unless an upper bound was stated.
	///
	/// A zero `budget_max` means no constraint, so a minimum on its own does not form a range.
	/// Two positive bounds given in the wrong order are swapped.
	pub fn widen(budget_min: i64, budget_max: i64) -> Option<Self> {
		if budget_max <= 0 {
			return None;
		}

		let (low, high) = if budget_min > budget_max {
			(budget_max, budget_min)
		} else {
			(budget_min, budget_max)
		};
		let min = if low <= 0 { 0 } else { low.saturating_sub(LOWER_SLACK).max(0) };

		Some(Self { min, max: high.saturating_add(UPPER_SLACK) })
	}

	pub fn contains(&self, price: f64) -> bool {
		price.is_finite() && price >= self.min as f64 && price <= self.max as f64
	}
}
