//! Laser-modulation classification.
//!
//! A unit whose laser curve is essentially a scaled copy of its control curve
//! is multiplicative (`MUL`); anything else is `MXH`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::data::model::UnitDataset;
use crate::error::{Result, TuningError};

/// Flank width reserved for a flank-suppression rule; currently inert.
pub const DEFAULT_FLANK_DEG: f64 = 60.0;

/// Control curves with a population standard deviation below this are flat.
pub const FLAT_STD_THRESHOLD: f64 = 1e-6;

/// Correlation above which laser is taken to scale control.
pub const CORRELATION_THRESHOLD: f64 = 0.95;

/// Modulation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "MUL")]
    Mul,
    #[serde(rename = "MXH")]
    Mxh,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Mul => "MUL",
            Label::Mxh => "MXH",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = TuningError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "MUL" => Ok(Label::Mul),
            "MXH" => Ok(Label::Mxh),
            other => Err(TuningError::InvalidOption {
                option: "label",
                value: other.to_string(),
                expected: "'MUL' | 'MXH'",
            }),
        }
    }
}

/// Pearson correlation coefficient of two equal-length series.
///
/// NaN when either series has no variance.
pub fn pearson(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(TuningError::InconsistentLength {
            expected: a.len(),
            found: b.len(),
        });
    }
    let cov = a.iter().covariance(b.iter());
    Ok(cov / (a.iter().std_dev() * b.iter().std_dev()))
}

/// Label one unit from its control and laser curves.
///
/// A flat control curve is `MUL` regardless of the laser curve.  Otherwise
/// the curves must have equal length and the unit is `MUL` iff their
/// correlation is strictly above [`CORRELATION_THRESHOLD`].
///
/// `_flank_deg` is accepted for callers of the flank-based rule but does not
/// affect the result.
pub fn classify(control: &[f64], laser: &[f64], _flank_deg: f64) -> Result<Label> {
    if control.iter().population_std_dev() < FLAT_STD_THRESHOLD {
        return Ok(Label::Mul);
    }
    let r = pearson(control, laser)?;
    // NaN (flat laser curve) compares false and lands in MXH.
    Ok(if r > CORRELATION_THRESHOLD {
        Label::Mul
    } else {
        Label::Mxh
    })
}

/// Label every unit of `dataset`, in dataset order.
pub fn classify_dataset(dataset: &UnitDataset, flank_deg: f64) -> Result<Vec<(i64, Label)>> {
    dataset
        .units
        .iter()
        .map(|u| Ok((u.id, classify(&u.control, &u.laser, flank_deg)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::data::model::unit;

    #[test]
    fn flat_control_is_mul() {
        let label = classify(&[5.0, 5.0, 5.0, 5.0], &[9.0, 1.0, 3.0, 0.0], DEFAULT_FLANK_DEG);
        assert_eq!(label.unwrap(), Label::Mul);
        // Even when the lengths disagree.
        let label = classify(&[5.0, 5.0], &[1.0, 2.0, 3.0], DEFAULT_FLANK_DEG);
        assert_eq!(label.unwrap(), Label::Mul);
    }

    #[test]
    fn identical_curves_are_mul() {
        let c = [1.0, 2.0, 3.0, 4.0];
        assert_abs_diff_eq!(pearson(&c, &c).unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(classify(&c, &c, DEFAULT_FLANK_DEG).unwrap(), Label::Mul);
    }

    #[test]
    fn scaled_curve_is_mul() {
        let c = [1.0, 3.0, 7.0, 3.0, 1.0];
        let l: Vec<f64> = c.iter().map(|v| 0.4 * v + 0.1).collect();
        assert_eq!(classify(&c, &l, DEFAULT_FLANK_DEG).unwrap(), Label::Mul);
    }

    #[test]
    fn uncorrelated_curves_are_mxh() {
        let theta: Vec<f64> = (0..8).map(|i| (i as f64 * 22.5).to_radians()).collect();
        let c: Vec<f64> = theta.iter().map(|t| (2.0 * t).cos()).collect();
        let l: Vec<f64> = theta.iter().map(|t| (2.0 * t).sin()).collect();
        assert_abs_diff_eq!(pearson(&c, &l).unwrap(), 0.0, epsilon = 1e-9);
        assert_eq!(classify(&c, &l, DEFAULT_FLANK_DEG).unwrap(), Label::Mxh);
    }

    #[test]
    fn threshold_is_strict() {
        // r just under the threshold
        let c = [1.0, 2.0, 3.0, 4.0, 5.0];
        let l = [1.0, 2.0, 3.0, 5.5, 3.5];
        let r = pearson(&c, &l).unwrap();
        assert!(r < CORRELATION_THRESHOLD, "r = {r}");
        assert_eq!(classify(&c, &l, DEFAULT_FLANK_DEG).unwrap(), Label::Mxh);
    }

    #[test]
    fn flat_laser_is_mxh() {
        let label = classify(&[1.0, 2.0, 3.0], &[2.0, 2.0, 2.0], DEFAULT_FLANK_DEG);
        assert_eq!(label.unwrap(), Label::Mxh);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let err = classify(&[1.0, 2.0, 3.0], &[1.0, 2.0], DEFAULT_FLANK_DEG).unwrap_err();
        assert!(matches!(
            err,
            TuningError::InconsistentLength { expected: 3, found: 2 }
        ));
    }

    #[test]
    fn flank_width_does_not_change_the_label() {
        let c = [1.0, 4.0, 2.0, 0.5];
        let l = [0.2, 3.0, 2.5, 1.0];
        let a = classify(&c, &l, 30.0).unwrap();
        let b = classify(&c, &l, 90.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn labels_parse_and_print() {
        assert_eq!("MXH".parse::<Label>().unwrap(), Label::Mxh);
        assert_eq!(Label::Mul.to_string(), "MUL");
        assert!("mul".parse::<Label>().is_err());
    }

    #[test]
    fn dataset_labels_follow_row_order() {
        let mut b = unit(8, "G", None, 0.2, None);
        b.laser = vec![4.0, 1.0, 3.0, 2.0];
        let ds = UnitDataset::from_units(vec![unit(7, "SG", None, 0.1, None), b]);
        let labels = classify_dataset(&ds, DEFAULT_FLANK_DEG).unwrap();
        assert_eq!(labels, vec![(7, Label::Mul), (8, Label::Mxh)]);
    }
}
