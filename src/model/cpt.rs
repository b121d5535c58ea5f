//! Variable domains and conditional probability tables.
//!
//! A node's table has one row per configuration of its parents and one
//! probability per value of its own domain. Rows are enumerated with the
//! first parent varying slowest and the last parent varying fastest; the
//! ordering is load-bearing for table exchange with the underlying network
//! and is exposed as the pure function [`parent_configurations`].

use crate::model::errors::EditError;

/// Tolerance used when checking that a table row sums to 1.
///
/// Slider and spin-box widgets quantize probabilities to two decimal
/// places, so committed rows carry small rounding residue.
pub const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// The domain of a network variable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VariableSpec {
    /// Binary labelized variable with domain `["F", "T"]`.
    Labelized,
    /// Integer range variable with domain `min..=max`.
    Ranged { min: i64, max: i64 },
}

impl VariableSpec {
    /// Creates a binary labelized variable.
    pub fn labelized() -> Self {
        VariableSpec::Labelized
    }

    /// Creates a range variable over `min..=max`.
    ///
    /// Fails with [`EditError::InvalidRange`] when `min > max`.
    pub fn ranged(min: i64, max: i64) -> Result<Self, EditError> {
        if min > max {
            return Err(EditError::InvalidRange { min, max });
        }
        Ok(VariableSpec::Ranged { min, max })
    }

    /// Number of values in the variable's domain.
    pub fn domain_size(&self) -> usize {
        match self {
            VariableSpec::Labelized => 2,
            VariableSpec::Ranged { min, max } => (max - min + 1) as usize,
        }
    }

    /// Display labels for the domain values, in domain order.
    pub fn domain_labels(&self) -> Vec<String> {
        match self {
            VariableSpec::Labelized => vec!["F".to_string(), "T".to_string()],
            VariableSpec::Ranged { min, max } => (*min..=*max).map(|v| v.to_string()).collect(),
        }
    }
}

/// Enumerates every parent configuration in table-row order.
///
/// The first parent's domain is iterated in the outer loop and the last
/// parent's domain in the inner loop, so configuration `i` corresponds to
/// table row `i`. An empty parent list yields a single empty configuration
/// (tables of root nodes have exactly one row).
///
/// # Example
///
/// ```rust,ignore
/// let configs = parent_configurations(&[2, 3]);
/// assert_eq!(configs[0], vec![0, 0]);
/// assert_eq!(configs[1], vec![0, 1]);
/// assert_eq!(configs[3], vec![1, 0]);
/// ```
pub fn parent_configurations(parent_domains: &[usize]) -> Vec<Vec<usize>> {
    let rows: usize = parent_domains.iter().product();
    let mut out = Vec::with_capacity(rows);
    for row in 0..rows {
        let mut config = vec![0usize; parent_domains.len()];
        let mut rest = row;
        // Decode right to left so the first parent varies slowest.
        for (slot, &dom) in config.iter_mut().zip(parent_domains.iter()).rev() {
            *slot = rest % dom;
            rest /= dom;
        }
        out.push(config);
    }
    out
}

/// A conditional probability table.
///
/// Dimensions are fixed at construction: one row per parent configuration,
/// one column per child-domain value. Validation happens when a table is
/// built from user-supplied rows, not continuously while widgets edit it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cpt {
    child_domain: usize,
    parent_domains: Vec<usize>,
    rows: Vec<Vec<f64>>,
}

impl Cpt {
    /// Builds a uniform table: every entry is `1 / child_domain`.
    ///
    /// This is the default registered for a fresh node and the reset value
    /// applied whenever a node's parent set changes shape.
    ///
    /// # Panics
    ///
    /// Panics if `child_domain` is zero or any parent domain is zero;
    /// variable domains always hold at least one value.
    pub fn uniform(child_domain: usize, parent_domains: Vec<usize>) -> Self {
        assert!(child_domain > 0, "child domain must be non-empty");
        assert!(
            parent_domains.iter().all(|&d| d > 0),
            "parent domains must be non-empty"
        );
        let row_count: usize = parent_domains.iter().product();
        let value = 1.0 / child_domain as f64;
        let rows = vec![vec![value; child_domain]; row_count];
        Cpt {
            child_domain,
            parent_domains,
            rows,
        }
    }

    /// Builds a table from user-supplied rows, validating shape and sums.
    ///
    /// # Arguments
    ///
    /// * `child_domain` - Number of values in the node's own domain
    /// * `parent_domains` - Domain sizes of the parents, in parent order
    /// * `rows` - One row per parent configuration, in enumeration order
    ///
    /// # Returns
    ///
    /// * `Err(CptShapeMismatch)` - Wrong row count or row width
    /// * `Err(ProbabilityOutOfRange)` - An entry outside `[0, 1]`
    /// * `Err(RowSumMismatch)` - A row off 1.0 by more than
    ///   [`ROW_SUM_TOLERANCE`]
    pub fn from_rows(
        child_domain: usize,
        parent_domains: Vec<usize>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, EditError> {
        let expected_rows: usize = parent_domains.iter().product();
        if rows.len() != expected_rows {
            return Err(EditError::CptShapeMismatch {
                expected_rows,
                expected_cols: child_domain,
                rows: rows.len(),
                cols: rows.first().map_or(0, Vec::len),
            });
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != child_domain {
                return Err(EditError::CptShapeMismatch {
                    expected_rows,
                    expected_cols: child_domain,
                    rows: rows.len(),
                    cols: row.len(),
                });
            }
            for &value in row {
                if !(0.0..=1.0).contains(&value) {
                    return Err(EditError::ProbabilityOutOfRange { row: i, value });
                }
            }
            let sum: f64 = row.iter().sum();
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(EditError::RowSumMismatch { row: i, sum });
            }
        }
        Ok(Cpt {
            child_domain,
            parent_domains,
            rows,
        })
    }

    /// Number of values in the child's domain (row width).
    pub fn child_domain(&self) -> usize {
        self.child_domain
    }

    /// Domain sizes of the parents, in parent order.
    pub fn parent_domains(&self) -> &[usize] {
        &self.parent_domains
    }

    /// Number of rows (product of the parent domain sizes).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The table rows, in parent-configuration enumeration order.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Maps a parent configuration to its row index.
    ///
    /// Returns `None` if the configuration has the wrong arity or any
    /// value falls outside its parent's domain.
    pub fn row_index(&self, config: &[usize]) -> Option<usize> {
        if config.len() != self.parent_domains.len() {
            return None;
        }
        let mut idx = 0usize;
        for (&value, &dom) in config.iter().zip(self.parent_domains.iter()) {
            if value >= dom {
                return None;
            }
            idx = idx * dom + value;
        }
        Some(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranged_spec_rejects_inverted_bounds() {
        let err = VariableSpec::ranged(3, 1).unwrap_err();
        assert!(matches!(err, EditError::InvalidRange { min: 3, max: 1 }));
    }

    #[test]
    fn domain_sizes_and_labels() {
        assert_eq!(VariableSpec::labelized().domain_size(), 2);
        assert_eq!(VariableSpec::labelized().domain_labels(), ["F", "T"]);

        let r = VariableSpec::ranged(2, 5).unwrap();
        assert_eq!(r.domain_size(), 4);
        assert_eq!(r.domain_labels(), ["2", "3", "4", "5"]);
    }

    #[test]
    fn configurations_enumerate_first_parent_outermost() {
        let configs = parent_configurations(&[2, 3]);
        assert_eq!(
            configs,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2],
            ]
        );
    }

    #[test]
    fn configurations_of_no_parents_is_single_empty_row() {
        assert_eq!(parent_configurations(&[]), vec![Vec::<usize>::new()]);
    }

    #[test]
    fn uniform_rows_sum_to_one() {
        let cpt = Cpt::uniform(3, vec![2, 2]);
        assert_eq!(cpt.row_count(), 4);
        for row in cpt.rows() {
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() <= ROW_SUM_TOLERANCE);
        }
    }

    #[test]
    fn row_index_matches_enumeration_order() {
        let cpt = Cpt::uniform(2, vec![2, 3]);
        for (i, config) in parent_configurations(&[2, 3]).iter().enumerate() {
            assert_eq!(cpt.row_index(config), Some(i));
        }
        assert_eq!(cpt.row_index(&[2, 0]), None);
        assert_eq!(cpt.row_index(&[0]), None);
    }

    #[test]
    fn from_rows_rejects_bad_sum_and_shape() {
        let err = Cpt::from_rows(2, vec![], vec![vec![0.4, 0.5]]).unwrap_err();
        assert!(matches!(err, EditError::RowSumMismatch { row: 0, .. }));

        let err = Cpt::from_rows(2, vec![2], vec![vec![0.5, 0.5]]).unwrap_err();
        assert!(matches!(
            err,
            EditError::CptShapeMismatch {
                expected_rows: 2,
                rows: 1,
                ..
            }
        ));

        let err = Cpt::from_rows(2, vec![], vec![vec![1.5, -0.5]]).unwrap_err();
        assert!(matches!(err, EditError::ProbabilityOutOfRange { row: 0, .. }));
    }

    #[test]
    fn from_rows_accepts_rounding_residue() {
        let rows = vec![vec![0.3333333, 0.6666667]];
        assert!(Cpt::from_rows(2, vec![], rows).is_ok());
    }
}
