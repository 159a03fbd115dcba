//! Jenks (Fisher) natural breaks classification: given a sequence of numeric
//! observations and a desired class count `k`, find the `k - 1` interior cut
//! points that partition the sorted values into `k` contiguous classes with
//! the least within-class sum of squared deviations from the class means.
//! This is the classical optimal univariate classification problem, solved
//! exactly here with Fisher's [dynamic programming](https://en.wikipedia.org/wiki/Dynamic_programming)
//! recurrence rather than the iterative Jenks heuristic, and widely used to
//! build choropleth-map legends and other 1-D binnings.
//!
//! The [`jenks_breaks`] function computes the break values. The
//! `classification` feature (enabled by default) adds the derived layer on
//! top: per-value class labels, per-class groupings, a
//! goodness-of-variance-fit statistic, and the [`NaturalBreaks`] convenience
//! wrapper.

use num_traits::cast::FromPrimitive;
use num_traits::{Num, NumCast};
use std::fmt::Debug;
use tracing::warn;

#[cfg(not(target_arch = "wasm32"))]
mod ffi;
#[cfg(not(target_arch = "wasm32"))]
pub use crate::ffi::{
    ExternalArray, InternalArray, WrapperArray, drop_jenks_breaks, jenks_breaks_ffi,
};
#[cfg(all(not(target_arch = "wasm32"), feature = "classification"))]
pub use crate::ffi::{drop_jenks_groups, jenks_groups_ffi};

#[cfg(target_arch = "wasm32")]
mod wasm;

mod errors;
pub use crate::errors::JenksError;

#[cfg(feature = "classification")]
mod classify;
#[cfg(feature = "classification")]
pub use crate::classify::{
    NaturalBreaks, classify, classify_all, goodness_of_variance_fit, group,
};

/// A trait that encompasses most common numeric types (integer **and** floating point)
pub trait JenksNum: Num + Copy + NumCast + PartialOrd + FromPrimitive + Debug {}
impl<T: Num + Copy + NumCast + PartialOrd + FromPrimitive + Debug> JenksNum for T {}

/// return a sorted **copy** of the input. Safe on `retain_finite` output only:
/// NaN has no ordering
fn numeric_sort<T: JenksNum>(arr: &[T]) -> Vec<T> {
    let mut xs = arr.to_vec();
    xs.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap());
    xs
}

/// Drop NaN and infinite entries, warning if any were present.
/// Integer input always passes through intact.
fn retain_finite<T: JenksNum>(data: &[T]) -> Vec<T> {
    let finite: Vec<T> = data
        .iter()
        .copied()
        .filter(|v| T::to_f64(v).is_some_and(f64::is_finite))
        .collect();
    let dropped = data.len() - finite.len();
    if dropped > 0 {
        warn!(
            dropped,
            remaining = finite.len(),
            "non-finite values (NaN or Inf) were ignored"
        );
    }
    finite
}

fn make_matrix<T: JenksNum>(columns: usize, rows: usize) -> Vec<Vec<T>> {
    let matrix: Vec<Vec<T>> = (0..columns).map(|_| vec![T::zero(); rows]).collect();
    matrix
}

/// Prefix sums of the sorted values and their squares, shifted by the median
/// so the subtraction in `ssq` stays numerically stable for large inputs.
/// Sums are accumulated in f64 whatever `T` is: an integer mean truncated by
/// integer division would distort the range costs enough to move the optimum.
fn prefix_sums<T: JenksNum>(data: &[T]) -> Option<(Vec<f64>, Vec<f64>)> {
    let nvalues = data.len();
    let mut sumx: Vec<f64> = vec![0.0; nvalues];
    let mut sumxsq: Vec<f64> = vec![0.0; nvalues];
    let shift = T::to_f64(&data[nvalues / 2])?;
    for (i, value) in data.iter().enumerate() {
        let centred = T::to_f64(value)? - shift;
        if i == 0 {
            sumx[0] = centred;
            sumxsq[0] = centred * centred;
        } else {
            sumx[i] = sumx[i - 1] + centred;
            sumxsq[i] = sumxsq[i - 1] + centred * centred;
        }
    }
    Some((sumx, sumxsq))
}

/// Sum of squared deviations from the mean of `data[j..=i]`, in O(1) from the
/// prefix sums. A single-element range costs zero; negative rounding residue
/// is clamped to zero.
#[inline(always)]
fn ssq(j: usize, i: usize, sumx: &[f64], sumxsq: &[f64]) -> f64 {
    let count = (i - j + 1) as f64;
    let sji = if j > 0 {
        let muji = (sumx[i] - sumx[j - 1]) / count;
        sumxsq[i] - sumxsq[j - 1] - count * muji * muji
    } else {
        sumxsq[i] - (sumx[i] * sumx[i]) / count
    };
    sji.max(0.0)
}

/// Fisher's exact dynamic program. `cost[c][i]` is the least total
/// sum-of-squares achievable by splitting `data[0..=i]` into `c + 1`
/// contiguous classes; `backtrack[c][i]` records the start index of the last
/// class in that optimum. Row `c` reads only row `c - 1`, so rows are filled
/// strictly in order.
fn fill_matrices<T: JenksNum>(
    data: &[T],
    cost: &mut [Vec<f64>],
    backtrack: &mut [Vec<usize>],
    nclasses: usize,
) -> Option<()> {
    let nvalues = data.len();
    let (sumx, sumxsq) = prefix_sums(data)?;
    for i in 0..nvalues {
        cost[0][i] = ssq(0, i, &sumx, &sumxsq);
        backtrack[0][i] = 0;
    }
    for c in 1..nclasses {
        // every class holds at least one value, so the last class can start
        // no earlier than index c
        for i in c..nvalues {
            let mut best = cost[c - 1][c - 1] + ssq(c, i, &sumx, &sumxsq);
            let mut split = c;
            for j in c + 1..=i {
                let candidate = cost[c - 1][j - 1] + ssq(j, i, &sumx, &sumxsq);
                // strict improvement only: on a cost tie the earliest
                // (lowest) split wins, matching the reference implementation
                if candidate < best {
                    best = candidate;
                    split = j;
                }
            }
            cost[c][i] = best;
            backtrack[c][i] = split;
        }
    }
    Some(())
}

/// Walk the backtrack matrix from the bottom-right corner, collecting the
/// upper bound of each class on the way down. Each interior break is the
/// largest member of the class below the boundary.
fn backtrack_breaks<T: JenksNum>(data: &[T], backtrack: &[Vec<usize>]) -> Vec<T> {
    let nvalues = data.len();
    let nclasses = backtrack.len();
    let mut breaks = vec![T::zero(); nclasses + 1];
    breaks[0] = data[0];
    breaks[nclasses] = data[nvalues - 1];
    let mut class_right = nvalues - 1;
    for c in (1..nclasses).rev() {
        let class_left = backtrack[c][class_right];
        breaks[c] = data[class_left - 1];
        class_right = class_left - 1;
    }
    breaks
}

/// Compute the Jenks natural breaks of `data` for `nclasses` classes.
///
/// Returns `nclasses + 1` break values: the minimum of the input, the
/// `nclasses - 1` interior cut points, then the maximum. Value `v` belongs to
/// class `i` iff `v <= breaks[i + 1]` and (`i == 0` or `v > breaks[i]`), so
/// each interior break is the largest member of its class. Breaks are
/// strictly increasing unless duplicate-heavy input forces a tie.
///
/// NaN and infinite entries are dropped (with a `tracing` warning) before
/// computation; `nclasses` is validated against the count of the values that
/// remain. When several partitions share the optimal cost, the one built
/// from the lowest split indexes is returned, so results are deterministic.
///
/// # Notes
/// Most common numeric (integer or floating point) types can be classified.
/// Range costs are always accumulated in f64, so integer input is
/// partitioned exactly like its float equivalent; break values are taken
/// from the input and keep their type.
///
/// # References
/// 1. [Jenks, G. F. (1967). The Data Model Concept in Statistical Mapping. International Yearbook of Cartography, 7, 186–190.](https://en.wikipedia.org/wiki/Jenks_natural_breaks_optimization)
/// 2. Fisher, W. D. (1958). On Grouping for Maximum Homogeneity. Journal of the American Statistical Association, 53(284), 789–798.
///
/// # Example
///
/// ```
/// use jenks::jenks_breaks;
///
/// let input = vec![
///     1.3f64, 7.1, 7.3, 2.3, 3.9, 4.1, 7.8, 1.2, 4.3, 7.3, 5.0, 4.3,
/// ];
/// let breaks = jenks_breaks(&input, 3).unwrap();
/// assert_eq!(breaks, vec![1.2, 2.3, 5.0, 7.8]);
/// ```
pub fn jenks_breaks<T: JenksNum>(data: &[T], nclasses: u8) -> Result<Vec<T>, JenksError> {
    if nclasses < 2 {
        return Err(JenksError::TooFewClasses(nclasses));
    }
    let finite = retain_finite(data);
    // `as` rather than `usize::from`: `NumCast` is in scope and also offers
    // a `from` on usize, so the `From` call would be ambiguous
    let nclasses = nclasses as usize;
    if nclasses >= finite.len() {
        return Err(JenksError::TooManyClasses {
            nclasses,
            nvalues: finite.len(),
        });
    }
    let sorted = numeric_sort(&finite);
    let nvalues = sorted.len();

    // named 'S' and 'J' in the classical formulation
    let mut cost: Vec<Vec<f64>> = make_matrix(nclasses, nvalues);
    let mut backtrack: Vec<Vec<usize>> = vec![vec![0; nvalues]; nclasses];

    fill_matrices(&sorted, &mut cost, &mut backtrack, nclasses).ok_or(JenksError::Conversion)?;

    // All the real work happens in the matrix generation: once the tables
    // encode every optimal sub-partition, the break values fall out of a
    // single backward walk.
    Ok(backtrack_breaks(&sorted, &backtrack))
}
