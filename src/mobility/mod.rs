//! Tabulated field to drift-speed relationships
//!
//! Drift speeds are taken from measured curves rather than an analytic mobility
//! model. Each carrier species loads its own two-column table, fields in MV / cm
//! against speeds in cm / s, and lookups interpolate linearly with clamping at
//! the table edges.

use crate::error::DataLoadError;
use crate::utilities;
use nalgebra::RealField;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// An immutable, monotone tabulated drift-speed curve for one carrier species
#[derive(Debug, Clone)]
pub struct MobilityCurve<T: Copy + RealField> {
    /// Tabulated field values in MV / cm, strictly increasing
    fields: Vec<T>,
    /// Tabulated drift speeds in cm / s
    speeds: Vec<T>,
}

impl<T: Copy + RealField> MobilityCurve<T> {
    /// Builds a curve from already-parsed `(field, speed)` pairs.
    ///
    /// The pairs must be non-empty and strictly increasing in field, the table
    /// is immutable once constructed.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (T, T)>) -> Result<Self, DataLoadError> {
        let (fields, speeds): (Vec<T>, Vec<T>) = pairs.into_iter().unzip();
        if fields.is_empty() {
            return Err(DataLoadError::Empty);
        }
        for (row, window) in fields.windows(2).enumerate() {
            if window[1] <= window[0] {
                return Err(DataLoadError::NonMonotone { row: row + 2 });
            }
        }
        Ok(Self { fields, speeds })
    }

    /// Parses a curve from a two-column text source.
    ///
    /// Unparsable rows are skipped with a diagnostic, a source yielding no rows
    /// at all is fatal.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, DataLoadError> {
        let (rows, skipped) = utilities::read_two_column_table(reader)?;
        if skipped > 0 {
            tracing::warn!("skipped {skipped} malformed mobility table rows");
        }
        Self::from_pairs(
            rows.into_iter()
                .map(|(x, y)| (T::from_f64(x).unwrap(), T::from_f64(y).unwrap())),
        )
    }

    /// Loads a curve from a file on disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DataLoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Drift speed in cm / s at field `e` in MV / cm.
    ///
    /// Queries outside the tabulated range clamp to the edge values.
    pub fn speed(&self, e: T) -> T {
        utilities::linear_interpolation(&self.fields, &self.speeds, e)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::MobilityCurve;
    use crate::error::DataLoadError;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn reference_curve() -> MobilityCurve<f64> {
        MobilityCurve::from_pairs([(1., 10.), (2., 20.), (3., 30.)]).unwrap()
    }

    #[test]
    fn lookups_reproduce_tabulated_points_exactly() {
        let curve = reference_curve();
        assert_relative_eq!(curve.speed(1.), 10.);
        assert_relative_eq!(curve.speed(2.), 20.);
        assert_relative_eq!(curve.speed(3.), 30.);
    }

    #[test]
    fn lookups_interpolate_and_clamp() {
        let curve = reference_curve();
        assert_relative_eq!(curve.speed(0.), 10.);
        assert_relative_eq!(curve.speed(1.5), 15.);
        assert_relative_eq!(curve.speed(5.), 30.);
    }

    #[test]
    fn malformed_rows_are_skipped_on_load() {
        let source = "0.1,1e6\ngarbage\n0.2,2e6\n";
        let curve = MobilityCurve::<f64>::from_reader(source.as_bytes()).unwrap();
        assert_eq!(curve.len(), 2);
    }

    #[test]
    fn an_empty_source_is_fatal() {
        let err = MobilityCurve::<f64>::from_reader("only\ngarbage\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::Empty));
    }

    #[test]
    fn non_monotone_tables_are_rejected() {
        let err =
            MobilityCurve::from_pairs([(1., 10.), (3., 30.), (2., 20.)]).unwrap_err();
        assert!(matches!(err, DataLoadError::NonMonotone { row: 3 }));
    }

    #[test]
    fn a_missing_file_is_unreadable() {
        let err = MobilityCurve::<f64>::from_path("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::Unreadable { .. }));
    }

    proptest! {
        #[test]
        fn lookups_stay_within_the_tabulated_envelope(q in -10f64..10.) {
            let curve = reference_curve();
            let speed = curve.speed(q);
            prop_assert!((10. ..=30.).contains(&speed));
        }
    }
}
