//! The derived-classification layer: class labels, per-class groupings and
//! the goodness-of-variance-fit statistic, all computed from the interior
//! breaks of one [`jenks_breaks`] run, plus the [`NaturalBreaks`] wrapper
//! that bundles them behind a fitted result struct.

use crate::{JenksError, JenksNum, jenks_breaks};

/// Map a single value to its 0-based class index given the sorted interior
/// breaks. The first break at or above the value decides the class; values
/// above every interior break fall into the last class, values below the
/// training minimum into class 0, so every finite value maps to exactly one
/// class.
pub fn classify<T: JenksNum>(value: T, inner_breaks: &[T]) -> usize {
    inner_breaks
        .iter()
        .position(|brk| value <= *brk)
        .unwrap_or(inner_breaks.len())
}

/// [classify] applied element-wise: one label per input value, input order
/// preserved.
pub fn classify_all<T: JenksNum>(data: &[T], inner_breaks: &[T]) -> Vec<usize> {
    data.iter()
        .map(|value| classify(*value, inner_breaks))
        .collect()
}

/// Partition `data` into `inner_breaks.len() + 1` classes. Each element lands
/// in the bucket [classify] assigns it, keeping its input order within the
/// bucket, so the buckets taken together are a permutation of the input.
/// Buckets may be empty when a slice being grouped has no member of some
/// class.
pub fn group<T: JenksNum>(data: &[T], inner_breaks: &[T]) -> Vec<Vec<T>> {
    let mut groups: Vec<Vec<T>> = vec![Vec::new(); inner_breaks.len() + 1];
    for &value in data {
        groups[classify(value, inner_breaks)].push(value);
    }
    groups
}

fn to_f64_vec<T: JenksNum>(data: &[T]) -> Result<Vec<f64>, JenksError> {
    data.iter()
        .map(|v| T::to_f64(v).ok_or(JenksError::Conversion))
        .collect()
}

/// The goodness of variance fit of a grouping:
/// `GVF = (SDAM - SDCM) / SDAM`, where SDAM is the sum of squared deviations
/// of all values from the global mean and SDCM the sum over groups of squared
/// deviations from each group's own mean. Lies in `[0, 1]` for any grouping
/// produced by [group]; higher is better. Zero-variance (or empty) input has
/// no defined GVF and is rejected as [`JenksError::DegenerateInput`].
pub fn goodness_of_variance_fit<T: JenksNum>(
    data: &[T],
    groups: &[Vec<T>],
) -> Result<f64, JenksError> {
    let values = to_f64_vec(data)?;
    if values.is_empty() {
        return Err(JenksError::DegenerateInput);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let sdam: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    if sdam == 0.0 {
        return Err(JenksError::DegenerateInput);
    }
    let mut sdcm = 0.0;
    for class in groups {
        if class.is_empty() {
            continue;
        }
        let members = to_f64_vec(class)?;
        let class_mean = members.iter().sum::<f64>() / members.len() as f64;
        sdcm += members
            .iter()
            .map(|v| (v - class_mean).powi(2))
            .sum::<f64>();
    }
    Ok((sdam - sdcm) / sdam)
}

/// The fitted result of one natural-breaks run: owns the breaks and answers
/// classification queries against them. The breaks never change after
/// [`NaturalBreaks::fit`]; refitting means building a new value.
///
/// # Example
///
/// ```
/// use jenks::NaturalBreaks;
///
/// let input = vec![
///     1.3f64, 7.1, 7.3, 2.3, 3.9, 4.1, 7.8, 1.2, 4.3, 7.3, 5.0, 4.3,
/// ];
/// let fitted = NaturalBreaks::fit(&input, 3).unwrap();
/// assert_eq!(fitted.breaks(), &[1.2, 2.3, 5.0, 7.8]);
/// assert_eq!(fitted.classify(4.0), 1);
/// assert!(fitted.goodness_of_variance_fit(&input).unwrap() > 0.9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NaturalBreaks<T: JenksNum> {
    breaks: Vec<T>,
}

impl<T: JenksNum> NaturalBreaks<T> {
    /// Compute the breaks for `data` and wrap them. Validation and non-finite
    /// filtering are those of [`jenks_breaks`].
    pub fn fit(data: &[T], nclasses: u8) -> Result<Self, JenksError> {
        let breaks = jenks_breaks(data, nclasses)?;
        Ok(NaturalBreaks { breaks })
    }

    /// All `nclasses + 1` break values, minimum and maximum included.
    pub fn breaks(&self) -> &[T] {
        &self.breaks
    }

    /// The `nclasses - 1` interior cut points.
    pub fn inner_breaks(&self) -> &[T] {
        &self.breaks[1..self.breaks.len() - 1]
    }

    /// The number of classes this value was fitted for.
    pub fn nclasses(&self) -> usize {
        self.breaks.len() - 1
    }

    /// The class index of a single value, including values outside the
    /// fitted range, which clamp to the edge classes.
    pub fn classify(&self, value: T) -> usize {
        classify(value, self.inner_breaks())
    }

    /// Class labels for a sequence of values, element-wise.
    pub fn predict(&self, data: &[T]) -> Vec<usize> {
        classify_all(data, self.inner_breaks())
    }

    /// Partition `data` into per-class collections.
    pub fn group(&self, data: &[T]) -> Vec<Vec<T>> {
        group(data, self.inner_breaks())
    }

    /// The goodness of variance fit of this value's breaks applied to `data`.
    pub fn goodness_of_variance_fit(&self, data: &[T]) -> Result<f64, JenksError> {
        goodness_of_variance_fit(data, &self.group(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const INPUT: [f64; 12] = [
        1.3, 7.1, 7.3, 2.3, 3.9, 4.1, 7.8, 1.2, 4.3, 7.3, 5.0, 4.3,
    ];

    #[test]
    fn test_classify_thresholds() {
        let inner = [2.3, 5.0];
        assert_eq!(classify(1.2, &inner), 0);
        // class boundaries are inclusive on the upper side
        assert_eq!(classify(2.3, &inner), 0);
        assert_eq!(classify(2.4, &inner), 1);
        assert_eq!(classify(5.0, &inner), 1);
        assert_eq!(classify(7.8, &inner), 2);
    }

    #[test]
    fn test_classify_clamps_out_of_range() {
        let inner = [2.3, 5.0];
        assert_eq!(classify(-1000.0, &inner), 0);
        assert_eq!(classify(1000.0, &inner), 2);
    }

    #[test]
    fn test_predict_labels() {
        let fitted = NaturalBreaks::fit(&INPUT, 3).unwrap();
        let labels = fitted.predict(&INPUT);
        assert_eq!(labels, vec![0, 2, 2, 0, 1, 1, 2, 0, 1, 2, 1, 1]);
    }

    #[test]
    fn test_group_partition() {
        let fitted = NaturalBreaks::fit(&INPUT, 3).unwrap();
        let groups = fitted.group(&INPUT);
        assert_eq!(groups.len(), 3);
        // input order is preserved within each class
        assert_eq!(groups[0], vec![1.3, 2.3, 1.2]);
        assert_eq!(groups[1], vec![3.9, 4.1, 4.3, 5.0, 4.3]);
        assert_eq!(groups[2], vec![7.1, 7.3, 7.8, 7.3]);
    }

    #[test]
    fn test_group_agrees_with_classify() {
        let fitted = NaturalBreaks::fit(&INPUT, 4).unwrap();
        let groups = fitted.group(&INPUT);
        for (class, members) in groups.iter().enumerate() {
            for &member in members {
                assert_eq!(fitted.classify(member), class);
            }
        }
        assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), INPUT.len());
    }

    #[test]
    fn test_gvf_perfect_partition() {
        // each class is constant, so no within-class deviation remains
        let data = vec![1.0f64, 1.0, 2.0, 2.0];
        let fitted = NaturalBreaks::fit(&data, 2).unwrap();
        assert_relative_eq!(fitted.goodness_of_variance_fit(&data).unwrap(), 1.0);
    }

    #[test]
    fn test_gvf_bounds() {
        for k in 2..=5u8 {
            let fitted = NaturalBreaks::fit(&INPUT, k).unwrap();
            let gvf = fitted.goodness_of_variance_fit(&INPUT).unwrap();
            assert!((0.0..=1.0).contains(&gvf), "gvf {gvf} out of bounds");
        }
    }

    #[test]
    fn test_gvf_improves_with_more_classes() {
        let fitted3 = NaturalBreaks::fit(&INPUT, 3).unwrap();
        let fitted4 = NaturalBreaks::fit(&INPUT, 4).unwrap();
        let gvf3 = fitted3.goodness_of_variance_fit(&INPUT).unwrap();
        let gvf4 = fitted4.goodness_of_variance_fit(&INPUT).unwrap();
        assert!(gvf4 >= gvf3);
    }

    #[test]
    fn test_gvf_degenerate_input() {
        let constant = vec![1.0f64, 1.0, 1.0];
        let inner = [1.0];
        let groups = group(&constant, &inner);
        assert_eq!(
            goodness_of_variance_fit(&constant, &groups),
            Err(JenksError::DegenerateInput)
        );
        assert_eq!(
            goodness_of_variance_fit::<f64>(&[], &[]),
            Err(JenksError::DegenerateInput)
        );
    }

    #[test]
    fn test_wrapper_accessors() {
        let fitted = NaturalBreaks::fit(&INPUT, 3).unwrap();
        assert_eq!(fitted.nclasses(), 3);
        assert_eq!(fitted.inner_breaks(), &[2.3, 5.0]);
        assert_eq!(fitted.breaks().len(), 4);
    }

    #[test]
    fn test_integer_classification() {
        let data = vec![100, 4, 2, 10, 1, 3, 12, 11, 5, 101];
        let fitted = NaturalBreaks::fit(&data, 3).unwrap();
        assert_eq!(fitted.inner_breaks(), &[5, 12]);
        assert_eq!(fitted.classify(7), 1);
        let groups = fitted.group(&data);
        assert_eq!(groups[2], vec![100, 101]);
    }
}
