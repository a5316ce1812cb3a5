//! Configuration for the native engine's automatic method selection.

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Thresholds deciding when `ConvMode::Auto` switches from direct summation
/// to FFT evaluation.
///
/// Both thresholds must be reached: the kernel must hold at least
/// `fft_min_kernel` elements and the multiply-accumulate count
/// (kernel elements times result elements) must be at least `fft_min_work`.
/// The work must also cover the transform cost, estimated as
/// `fft_cost_factor * m * ceil(log2 m)` for the `m` elements of the full
/// convolution plane, which the FFT path always evaluates.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct EngineConfig {
    pub fft_min_kernel: usize,
    pub fft_min_work: usize,
    pub fft_cost_factor: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fft_min_kernel: 32,
            fft_min_work: 1 << 18,
            fft_cost_factor: 8,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fft_min_kernel(mut self, elements: usize) -> Self {
        self.fft_min_kernel = elements;
        self
    }

    pub fn with_fft_min_work(mut self, work: usize) -> Self {
        self.fft_min_work = work;
        self
    }

    pub fn with_fft_cost_factor(mut self, factor: usize) -> Self {
        self.fft_cost_factor = factor;
        self
    }

    /// Configuration that never selects the FFT path.
    pub fn direct_only() -> Self {
        Self {
            fft_min_kernel: usize::MAX,
            fft_min_work: usize::MAX,
            fft_cost_factor: usize::MAX,
        }
    }

    /// Configuration that always selects the FFT path.
    pub fn fft_only() -> Self {
        Self {
            fft_min_kernel: 0,
            fft_min_work: 0,
            fft_cost_factor: 0,
        }
    }

    /// Whether a task is cheaper by FFT, given its kernel, result and full
    /// convolution plane element counts.
    pub(crate) fn prefers_fft(
        &self,
        kernel_elements: usize,
        result_elements: usize,
        full_elements: usize,
    ) -> bool {
        let work = kernel_elements.saturating_mul(result_elements);
        kernel_elements >= self.fft_min_kernel
            && work >= self.fft_min_work
            && work >= self.fft_cost(full_elements)
    }

    fn fft_cost(&self, full_elements: usize) -> usize {
        let log2 = (usize::BITS - full_elements.saturating_sub(1).leading_zeros()) as usize;
        self.fft_cost_factor
            .saturating_mul(full_elements)
            .saturating_mul(log2.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefers_direct_for_small_kernels() {
        let config = EngineConfig::default();
        assert!(!config.prefers_fft(3, 1_000_000, 1_000_002));
        assert!(!config.prefers_fft(64, 10, 10_000));
        assert!(config.prefers_fft(512, 1 << 14, (1 << 14) + 511));
    }

    #[test]
    fn test_transform_cost_counts_the_full_plane() {
        let config = EngineConfig::default();
        // Same work, but a long input makes the transform far larger.
        assert!(config.prefers_fft(512, 4096, 4096 + 511));
        assert!(!config.prefers_fft(512, 4096, 4_000_000 + 511));
        assert!(!config.prefers_fft(64, 4096, 4_000_063));
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::new()
            .with_fft_min_kernel(4)
            .with_fft_min_work(100)
            .with_fft_cost_factor(0);
        assert!(config.prefers_fft(4, 25, 28));
        assert!(!config.prefers_fft(4, 24, 27));
        let config = config.with_fft_cost_factor(1);
        assert!(!config.prefers_fft(4, 25, 1000));
        assert!(!EngineConfig::direct_only().prefers_fft(usize::MAX - 1, 2, 8));
        assert!(EngineConfig::fft_only().prefers_fft(1, 1, usize::MAX));
    }

    #[cfg(feature = "serialize")]
    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"fft_min_kernel": 8}"#).unwrap();
        assert_eq!(config.fft_min_kernel, 8);
        assert_eq!(config.fft_min_work, EngineConfig::default().fft_min_work);
        assert_eq!(config.fft_cost_factor, 8);
    }
}
