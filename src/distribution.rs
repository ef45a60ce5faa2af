//! Histogram-backed distribution of a duration sample
//!
//! Built once per run from the full `t_delta_ns` sample of one function:
//! unit-width (1 ns) bins, density-normalized, with linear interpolation
//! inside bins for the CDF and its inverse. A single-valued sample is a
//! point mass: every quantile query resolves to that value, so IQR and the
//! Tukey fences collapse onto it.

use tracing::debug;

#[derive(Debug, Clone)]
pub struct SampleDistribution {
    /// Left edge of the first bin.
    origin: u64,
    /// Probability mass per unit bin (equals the density, width = 1).
    probs: Vec<f64>,
    /// Cumulative probability at each bin's right edge.
    cum: Vec<f64>,
    sample_min: u64,
    sample_max: u64,
}

impl SampleDistribution {
    /// Build the distribution from a raw sample. `None` when empty.
    pub fn from_sample(sample: &[u64]) -> Option<Self> {
        let min = *sample.iter().min()?;
        let max = *sample.iter().max()?;
        let bins = (max - min + 1) as usize;
        debug!(n = sample.len(), min, max, bins, "building histogram");

        let mut counts = vec![0u64; bins];
        for &v in sample {
            counts[(v - min) as usize] += 1;
        }
        let n = sample.len() as f64;
        let probs: Vec<f64> = counts.iter().map(|&c| c as f64 / n).collect();
        let mut cum = Vec::with_capacity(bins);
        let mut acc = 0.0;
        for &p in &probs {
            acc += p;
            cum.push(acc);
        }
        // pin the last edge against float drift
        if let Some(last) = cum.last_mut() {
            *last = 1.0;
        }

        Some(Self {
            origin: min,
            probs,
            cum,
            sample_min: min,
            sample_max: max,
        })
    }

    pub fn sample_min(&self) -> u64 {
        self.sample_min
    }

    pub fn sample_max(&self) -> u64 {
        self.sample_max
    }

    fn is_point_mass(&self) -> bool {
        self.sample_min == self.sample_max
    }

    /// Probability density at `x`.
    pub fn pdf(&self, x: f64) -> f64 {
        let lo = self.origin as f64;
        if x < lo {
            return 0.0;
        }
        let idx = (x - lo).floor() as usize;
        self.probs.get(idx).copied().unwrap_or(0.0)
    }

    /// Cumulative distribution function at `x`.
    pub fn cdf(&self, x: f64) -> f64 {
        if self.is_point_mass() {
            return if x < self.sample_min as f64 { 0.0 } else { 1.0 };
        }
        let lo = self.origin as f64;
        if x <= lo {
            return 0.0;
        }
        let offset = x - lo;
        let idx = offset.floor() as usize;
        if idx >= self.probs.len() {
            return 1.0;
        }
        let below = if idx == 0 { 0.0 } else { self.cum[idx - 1] };
        below + self.probs[idx] * (offset - idx as f64)
    }

    /// Percent point function (inverse CDF) at quantile `q`.
    pub fn ppf(&self, q: f64) -> f64 {
        if self.is_point_mass() {
            return self.sample_min as f64;
        }
        let q = q.clamp(0.0, 1.0);
        let lo = self.origin as f64;
        if q <= 0.0 {
            return lo;
        }
        let idx = match self.cum.iter().position(|&c| c >= q) {
            Some(idx) => idx,
            None => return lo + self.probs.len() as f64,
        };
        let below = if idx == 0 { 0.0 } else { self.cum[idx - 1] };
        let within = if self.probs[idx] > 0.0 {
            (q - below) / self.probs[idx]
        } else {
            0.0
        };
        lo + idx as f64 + within
    }

    /// Mean of the continuous histogram distribution.
    pub fn mean(&self) -> f64 {
        if self.is_point_mass() {
            return self.sample_min as f64;
        }
        let lo = self.origin as f64;
        self.probs
            .iter()
            .enumerate()
            .map(|(i, p)| p * (lo + i as f64 + 0.5))
            .sum()
    }

    /// Standard deviation of the continuous histogram distribution.
    pub fn std(&self) -> f64 {
        if self.is_point_mass() {
            return 0.0;
        }
        let mean = self.mean();
        let lo = self.origin as f64;
        let var: f64 = self
            .probs
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mid = lo + i as f64 + 0.5;
                p * (mid - mean) * (mid - mean)
            })
            .sum::<f64>()
            // uniform spread inside each unit bin
            + 1.0 / 12.0;
        var.sqrt()
    }
}

/// Summary statistics derived from a distribution, including the Tukey
/// fences used as the default plotting-range heuristic.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
    pub mean: f64,
    pub std: f64,
}

impl DistributionStats {
    pub fn from_distribution(dist: &SampleDistribution) -> Self {
        let q1 = dist.ppf(0.25);
        let median = dist.ppf(0.50);
        let q3 = dist.ppf(0.75);
        let iqr = q3 - q1;
        Self {
            q1,
            median,
            q3,
            iqr,
            lower_fence: q1 - 1.5 * iqr,
            upper_fence: q3 + 1.5 * iqr,
            mean: dist.mean(),
            std: dist.std(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample_has_no_distribution() {
        assert!(SampleDistribution::from_sample(&[]).is_none());
    }

    #[test]
    fn test_single_value_sample_collapses_fences() {
        let dist = SampleDistribution::from_sample(&[42]).unwrap();
        let stats = DistributionStats::from_distribution(&dist);
        assert_eq!(stats.iqr, 0.0);
        assert_eq!(stats.lower_fence, 42.0);
        assert_eq!(stats.upper_fence, 42.0);
        assert_eq!(stats.mean, 42.0);
        assert_eq!(stats.std, 0.0);
    }

    #[test]
    fn test_cdf_is_monotonic_and_bounded() {
        let dist = SampleDistribution::from_sample(&[10, 11, 11, 12, 15, 20]).unwrap();
        let mut prev = 0.0;
        let mut x = 9.0;
        while x <= 21.0 {
            let c = dist.cdf(x);
            assert!((0.0..=1.0).contains(&c));
            assert!(c >= prev);
            prev = c;
            x += 0.25;
        }
        assert_eq!(dist.cdf(9.0), 0.0);
        assert_eq!(dist.cdf(21.5), 1.0);
    }

    #[test]
    fn test_ppf_inverts_cdf_inside_support() {
        let dist = SampleDistribution::from_sample(&[100, 101, 102, 103, 104, 105]).unwrap();
        for q in [0.1, 0.25, 0.5, 0.75, 0.9] {
            let x = dist.ppf(q);
            assert!((dist.cdf(x) - q).abs() < 1e-9, "q={q} x={x}");
        }
    }

    #[test]
    fn test_quantiles_are_ordered() {
        let dist = SampleDistribution::from_sample(&[5, 9, 9, 9, 30, 30, 80]).unwrap();
        let stats = DistributionStats::from_distribution(&dist);
        assert!(stats.q1 <= stats.median);
        assert!(stats.median <= stats.q3);
        assert!(stats.lower_fence <= stats.q1);
        assert!(stats.q3 <= stats.upper_fence);
    }

    #[test]
    fn test_mean_of_symmetric_sample_is_central() {
        // bins [10,11) and [12,13), equal mass, midpoints 10.5 and 12.5
        let dist = SampleDistribution::from_sample(&[10, 12]).unwrap();
        assert!((dist.mean() - 11.5).abs() < 1e-9);
    }

    #[test]
    fn test_density_integrates_to_one() {
        let dist = SampleDistribution::from_sample(&[3, 3, 4, 7]).unwrap();
        let total: f64 = dist.probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
