use crate::Result;
use anyhow::bail;
use serde::Serialize;

/// Population mean and standard deviation of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStat {
    pub mean: f64,
    pub sigma: f64,
}

/// Mean and population sigma: `m = Σx/n`, `σ = sqrt(Σx²/n − m²)`.
///
/// Fails on an empty series. Rounding can push the variance a hair below zero;
/// it is clamped so sigma is never NaN.
pub fn summarize(values: &[f64]) -> Result<SummaryStat> {
    if values.is_empty() {
        bail!("empty series: cannot compute mean of zero samples");
    }
    let n = values.len() as f64;
    let (sum, sum2) = values
        .iter()
        .fold((0.0f64, 0.0f64), |(s, s2), &x| (s + x, s2 + x * x));
    let mean = sum / n;
    let variance = (sum2 / n - mean * mean).max(0.0);
    Ok(SummaryStat {
        mean,
        sigma: variance.sqrt(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn single_sample_has_zero_sigma() {
        assert_eq!(
            summarize(&[10.5]).unwrap(),
            SummaryStat {
                mean: 10.5,
                sigma: 0.0
            }
        );
    }

    #[test]
    fn population_sigma() {
        // Population (not sample) deviation of 2,4,4,4,5,5,7,9 is exactly 2.
        let s = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(s.mean, 5.0);
        assert_eq!(s.sigma, 2.0);
    }

    #[test]
    fn empty_series_fails() {
        let err = summarize(&[]).unwrap_err();
        assert!(err.to_string().contains("empty series"));
    }

    proptest! {
        #[test]
        fn mean_is_average_and_sigma_non_negative(
            values in prop::collection::vec(-1.0e6f64..1.0e6, 1..64)
        ) {
            let s = summarize(&values).unwrap();
            let avg = values.iter().sum::<f64>() / values.len() as f64;
            prop_assert!((s.mean - avg).abs() <= 1e-9 * (1.0 + avg.abs()));
            prop_assert!(s.sigma >= 0.0);
            prop_assert!(!s.sigma.is_nan());
        }

        // Σx/n does not give back v exactly for most decimals (three 0.1s average to
        // 0.10000000000000002), so exact equality only holds where every sum and
        // square is representable. Quarter steps are; arbitrary floats are not.
        #[test]
        fn constant_series_has_zero_sigma(
            quarters in -4000i32..4000,
            n in 1usize..50
        ) {
            let v = quarters as f64 / 4.0;
            let s = summarize(&vec![v; n]).unwrap();
            prop_assert_eq!(s, SummaryStat { mean: v, sigma: 0.0 });
        }
    }
}
