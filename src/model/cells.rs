use std::fmt;

/// How a missing or malformed score cell enters aggregation.
///
/// Extraction never decides this: cells arrive as `Option<f64>` and the
/// policy is applied where values are averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingCellPolicy {
    /// Missing cells count as a true `0.0`.
    #[default]
    Zero,
    /// Missing cells are left out of every mean they would have entered.
    Exclude,
}

impl MissingCellPolicy {
    pub fn apply(self, cell: Option<f64>) -> Option<f64> {
        match (cell, self) {
            (Some(v), _) => Some(v),
            (None, MissingCellPolicy::Zero) => Some(0.0),
            (None, MissingCellPolicy::Exclude) => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MissingCellPolicy::Zero => "zero",
            MissingCellPolicy::Exclude => "exclude",
        }
    }
}

impl fmt::Display for MissingCellPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
