//! The input contract handed to the engine by a loader.
//!
//! ## Encoding
//!
//! All ids are 0-based. Rows are ragged and may be padded with
//! [`END_OF_LIST`]; a row's real entries stop at the first sentinel and
//! anything after it is ignored. Any other negative value is out of range.
//!
//! ## Validation
//!
//! [`PreferenceData::validate`] checks every table against the declared
//! proposer/receiver counts before any entity is built. After it passes, the
//! engine never re-validates.

use crate::error::{Axis, Malformation, MatchError, Table};
use crate::types::ReceiverId;

/// Sentinel marking "no further entries" in a preference row.
pub const END_OF_LIST: i64 = -1;

/// Real entries of a row: everything before the first sentinel.
pub(crate) fn real_entries(row: &[i64]) -> &[i64] {
    let end = row
        .iter()
        .position(|&value| value == END_OF_LIST)
        .unwrap_or(row.len());
    &row[..end]
}

/// Raw, index-normalized preference tables for one matching run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreferenceData {
    /// One row per proposer: receiver ids, most preferred first
    pub proposer_preferences: Vec<Vec<i64>>,

    /// One row per receiver: acceptable proposer ids, most preferred first
    pub receiver_preferences: Vec<Vec<i64>>,

    /// One row per receiver: unacceptable proposer ids, in no particular order
    pub receiver_unacceptable: Vec<Vec<i64>>,

    /// One capacity per receiver
    pub capacities: Vec<i64>,
}

impl PreferenceData {
    pub fn new(
        proposer_preferences: Vec<Vec<i64>>,
        receiver_preferences: Vec<Vec<i64>>,
        receiver_unacceptable: Vec<Vec<i64>>,
        capacities: Vec<i64>,
    ) -> Self {
        Self {
            proposer_preferences,
            receiver_preferences,
            receiver_unacceptable,
            capacities,
        }
    }

    /// Number of proposer rows present
    #[inline]
    pub fn proposer_count(&self) -> usize {
        self.proposer_preferences.len()
    }

    /// Number of receiver rows present
    #[inline]
    pub fn receiver_count(&self) -> usize {
        self.receiver_preferences.len()
    }

    /// Check every table against the declared counts.
    ///
    /// Dimensions are checked first, then capacities, then the content of
    /// each row. The first problem found is returned.
    pub fn validate(&self, num_proposers: usize, num_receivers: usize) -> Result<(), MatchError> {
        check_rows(Table::ProposerPreferences, self.proposer_preferences.len(), num_proposers)?;
        check_rows(Table::ReceiverPreferences, self.receiver_preferences.len(), num_receivers)?;
        check_rows(Table::ReceiverUnacceptable, self.receiver_unacceptable.len(), num_receivers)?;
        check_rows(Table::Capacities, self.capacities.len(), num_receivers)?;

        for row in &self.proposer_preferences {
            check_columns(Table::ProposerPreferences, row.len(), num_receivers)?;
        }
        for row in &self.receiver_preferences {
            check_columns(Table::ReceiverPreferences, row.len(), num_proposers)?;
        }
        for row in &self.receiver_unacceptable {
            check_columns(Table::ReceiverUnacceptable, row.len(), num_proposers)?;
        }

        for (receiver, &capacity) in self.capacities.iter().enumerate() {
            if capacity <= 0 {
                return Err(MatchError::NonPositiveCapacity {
                    receiver: ReceiverId(receiver),
                    capacity,
                });
            }
        }

        for (row, prefs) in self.proposer_preferences.iter().enumerate() {
            check_distinct(Table::ProposerPreferences, row, prefs, num_receivers)?;
        }

        for (row, (acceptable, unacceptable)) in self
            .receiver_preferences
            .iter()
            .zip(&self.receiver_unacceptable)
            .enumerate()
        {
            let seen = check_distinct(Table::ReceiverPreferences, row, acceptable, num_proposers)?;
            let excluded =
                check_distinct(Table::ReceiverUnacceptable, row, unacceptable, num_proposers)?;

            if let Some(index) = (0..num_proposers).find(|&i| seen[i] && excluded[i]) {
                return Err(MatchError::MalformedPreferenceList {
                    table: Table::ReceiverUnacceptable,
                    row,
                    reason: Malformation::Conflicting(index as i64),
                });
            }
        }

        Ok(())
    }
}

fn check_rows(table: Table, actual: usize, expected: usize) -> Result<(), MatchError> {
    if actual != expected {
        return Err(MatchError::InvalidDimensions {
            table,
            axis: Axis::Rows,
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_columns(table: Table, actual: usize, limit: usize) -> Result<(), MatchError> {
    if actual > limit {
        return Err(MatchError::InvalidDimensions {
            table,
            axis: Axis::Columns,
            expected: limit,
            actual,
        });
    }
    Ok(())
}

/// Range- and duplicate-check a row; returns the membership mask of its ids.
fn check_distinct(
    table: Table,
    row: usize,
    entries: &[i64],
    limit: usize,
) -> Result<Vec<bool>, MatchError> {
    let mut seen = vec![false; limit];

    for &value in real_entries(entries) {
        let index = usize::try_from(value)
            .ok()
            .filter(|&index| index < limit)
            .ok_or(MatchError::MalformedPreferenceList {
                table,
                row,
                reason: Malformation::OutOfRange(value),
            })?;

        if seen[index] {
            return Err(MatchError::MalformedPreferenceList {
                table,
                row,
                reason: Malformation::Duplicate(value),
            });
        }
        seen[index] = true;
    }

    Ok(seen)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> PreferenceData {
        PreferenceData::new(
            vec![vec![0, 1], vec![1, -1]],
            vec![vec![1, 0], vec![0, -1]],
            vec![vec![-1, -1], vec![1, -1]],
            vec![1, 2],
        )
    }

    #[test]
    fn test_real_entries_stop_at_sentinel() {
        assert_eq!(real_entries(&[2, 0, -1, 1]), &[2, 0]);
        assert_eq!(real_entries(&[-1, 3]), &[] as &[i64]);
        assert_eq!(real_entries(&[1, 2]), &[1, 2]);
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        assert_eq!(two_by_two().validate(2, 2), Ok(()));
    }

    #[test]
    fn test_validate_row_count() {
        let err = two_by_two().validate(3, 2).unwrap_err();
        assert_eq!(
            err,
            MatchError::InvalidDimensions {
                table: Table::ProposerPreferences,
                axis: Axis::Rows,
                expected: 3,
                actual: 2,
            }
        );

        let mut data = two_by_two();
        data.capacities.pop();
        assert!(matches!(
            data.validate(2, 2),
            Err(MatchError::InvalidDimensions { table: Table::Capacities, .. })
        ));
    }

    #[test]
    fn test_validate_row_too_wide() {
        let mut data = two_by_two();
        data.proposer_preferences[0] = vec![0, 1, -1];
        assert!(matches!(
            data.validate(2, 2),
            Err(MatchError::InvalidDimensions { axis: Axis::Columns, expected: 2, actual: 3, .. })
        ));
    }

    #[test]
    fn test_validate_non_positive_capacity() {
        let mut data = two_by_two();
        data.capacities[1] = 0;
        assert_eq!(
            data.validate(2, 2),
            Err(MatchError::NonPositiveCapacity { receiver: ReceiverId(1), capacity: 0 })
        );
    }

    #[test]
    fn test_validate_duplicate() {
        let mut data = two_by_two();
        data.proposer_preferences[1] = vec![1, 1];
        assert_eq!(
            data.validate(2, 2),
            Err(MatchError::MalformedPreferenceList {
                table: Table::ProposerPreferences,
                row: 1,
                reason: Malformation::Duplicate(1),
            })
        );
    }

    #[test]
    fn test_validate_out_of_range() {
        let mut data = two_by_two();
        data.receiver_preferences[0] = vec![2, -1];
        assert_eq!(
            data.validate(2, 2),
            Err(MatchError::MalformedPreferenceList {
                table: Table::ReceiverPreferences,
                row: 0,
                reason: Malformation::OutOfRange(2),
            })
        );

        // Negative values other than the sentinel are out of range too
        let mut data = two_by_two();
        data.proposer_preferences[0] = vec![-2, 0];
        assert!(matches!(
            data.validate(2, 2),
            Err(MatchError::MalformedPreferenceList { reason: Malformation::OutOfRange(-2), .. })
        ));
    }

    #[test]
    fn test_validate_conflicting_lists() {
        let mut data = two_by_two();
        data.receiver_unacceptable[1] = vec![0, -1];
        assert_eq!(
            data.validate(2, 2),
            Err(MatchError::MalformedPreferenceList {
                table: Table::ReceiverUnacceptable,
                row: 1,
                reason: Malformation::Conflicting(0),
            })
        );
    }

    #[test]
    fn test_entries_after_sentinel_ignored() {
        let mut data = two_by_two();
        // Trailing junk after the sentinel is never inspected
        data.proposer_preferences[1] = vec![-1, 7];
        data.receiver_preferences[1] = vec![-1, 5];
        assert_eq!(data.validate(2, 2), Ok(()));
    }
}
