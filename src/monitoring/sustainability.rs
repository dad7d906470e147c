//! 環境負荷指標

use serde::{Deserialize, Serialize};

/// 換算係数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SustainabilityConfig {
    /// 削減CO2換算（kg/kWh）
    pub co2_saved_per_kwh: f64,
    /// 排出CO2換算（kg/kWh）
    pub footprint_per_kwh: f64,
    /// 樹木1本あたりの年間吸収量（kg）
    pub co2_per_tree: f64,
    /// これ未満は Low
    pub low_threshold_kwh: f64,
    /// これ未満は Moderate
    pub moderate_threshold_kwh: f64,
}

impl Default for SustainabilityConfig {
    fn default() -> Self {
        Self {
            co2_saved_per_kwh: 0.42,
            footprint_per_kwh: 0.52,
            co2_per_tree: 20.0,
            low_threshold_kwh: 100.0,
            moderate_threshold_kwh: 500.0,
        }
    }
}

/// 影響度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactLevel {
    Low,
    Moderate,
    High,
}

/// 環境負荷指標
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SustainabilityMetrics {
    pub total_kwh: f64,
    pub co2_saved: f64,
    pub trees_equivalent: u64,
    pub carbon_footprint: f64,
    pub impact_level: ImpactLevel,
}

impl SustainabilityMetrics {
    /// 累計消費量から計算
    pub fn from_total(total_kwh: f64, config: &SustainabilityConfig) -> Self {
        let co2_saved = total_kwh * config.co2_saved_per_kwh;
        let trees_equivalent = if config.co2_per_tree > 0.0 {
            (co2_saved / config.co2_per_tree).floor().max(0.0) as u64
        } else {
            0
        };

        let impact_level = if total_kwh < config.low_threshold_kwh {
            ImpactLevel::Low
        } else if total_kwh < config.moderate_threshold_kwh {
            ImpactLevel::Moderate
        } else {
            ImpactLevel::High
        };

        Self {
            total_kwh,
            co2_saved,
            trees_equivalent,
            carbon_footprint: total_kwh * config.footprint_per_kwh,
            impact_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_total() {
        let metrics = SustainabilityMetrics::from_total(250.0, &SustainabilityConfig::default());

        assert!((metrics.co2_saved - 105.0).abs() < 1e-9);
        assert_eq!(metrics.trees_equivalent, 5);
        assert!((metrics.carbon_footprint - 130.0).abs() < 1e-9);
        assert_eq!(metrics.impact_level, ImpactLevel::Moderate);
    }

    #[test]
    fn test_impact_boundaries() {
        let config = SustainabilityConfig::default();
        assert_eq!(
            SustainabilityMetrics::from_total(99.9, &config).impact_level,
            ImpactLevel::Low
        );
        assert_eq!(
            SustainabilityMetrics::from_total(100.0, &config).impact_level,
            ImpactLevel::Moderate
        );
        assert_eq!(
            SustainabilityMetrics::from_total(500.0, &config).impact_level,
            ImpactLevel::High
        );
    }

    #[test]
    fn test_zero_total() {
        let metrics = SustainabilityMetrics::from_total(0.0, &SustainabilityConfig::default());
        assert_eq!(metrics.trees_equivalent, 0);
        assert_eq!(metrics.impact_level, ImpactLevel::Low);
    }
}
