use crate::analytics::{AnomalyConfig, ForecastConfig};
use crate::error::{Error, Result};
use crate::logging::LogRotation;
use crate::monitoring::SustainabilityConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 設定ファイルの探索順
const CONFIG_PATHS: [&str; 3] = [
    "energy-analytics.toml",
    "config.toml",
    "config/energy-analytics.toml",
];

/// 環境変数のプレフィックス（例: ENERGY_ANOMALY__Z_THRESHOLD=3.0）
const ENV_PREFIX: &str = "ENERGY";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub log_level: String,
    /// 指定するとファイルにもログを出力する
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
    pub log_rotation: LogRotation,
    pub anomaly: AnomalyConfig,
    pub forecast: ForecastConfig,
    pub sustainability: SustainabilityConfig,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
            log_rotation: LogRotation::Daily,
            anomaly: AnomalyConfig::default(),
            forecast: ForecastConfig::default(),
            sustainability: SustainabilityConfig::default(),
        }
    }
}

impl AnalyticsConfig {
    /// デフォルト → 設定ファイル → 環境変数 の順に読み込む
    ///
    /// `path` を指定した場合はそのファイルが必須
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        // デフォルト値を設定
        settings = settings.add_source(config::Config::try_from(&Self::default())?);

        match path {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                if let Some(found) = CONFIG_PATHS.iter().find(|p| Path::new(p).exists()) {
                    tracing::debug!("Loading configuration from {}", found);
                    settings = settings.add_source(config::File::with_name(found));
                }
            }
        }

        // 環境変数で上書き (ENERGY_ で始まる変数)
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 設定値の整合性を検証
    pub fn validate(&self) -> Result<()> {
        check_window("anomaly", self.anomaly.window, self.anomaly.min_history)?;
        check_window("forecast", self.forecast.window, self.forecast.min_history)?;

        if !(self.anomaly.z_threshold.is_finite() && self.anomaly.z_threshold > 0.0) {
            return Err(Error::Config(format!(
                "anomaly.z_threshold must be positive, got {}",
                self.anomaly.z_threshold
            )));
        }
        if self.forecast.stability_threshold.is_nan() || self.forecast.stability_threshold < 0.0 {
            return Err(Error::Config(
                "forecast.stability_threshold must not be negative".to_string(),
            ));
        }
        if self.sustainability.low_threshold_kwh > self.sustainability.moderate_threshold_kwh {
            return Err(Error::Config(
                "sustainability.low_threshold_kwh exceeds moderate_threshold_kwh".to_string(),
            ));
        }

        Ok(())
    }

    /// サンプル設定ファイルの内容を生成
    pub fn sample_toml() -> Result<String> {
        let toml_content = toml::to_string_pretty(&Self::default())
            .map_err(|e| Error::Config(e.to_string()))?;

        Ok(format!(
            r#"# energy-analytics configuration
#
# energy-analytics.toml として保存してください
# 環境変数での上書きも可能です (例: ENERGY_ANOMALY__WINDOW=45)

{}
# log_dir      = ログファイルの出力先（未指定ならコンソールのみ）
# log_rotation = daily / hourly / never
#
# [anomaly]
# window      = ベースラインに使う最新計測の件数
# min_history = これ未満の履歴では異常判定しない
# z_threshold = |Z-スコア| がこれを超えたら異常
#
# [forecast]
# window      = 回帰に使う最新計測の件数
# min_history = これ未満の履歴では予測しない
"#,
            toml_content
        ))
    }
}

fn check_window(section: &str, window: usize, min_history: usize) -> Result<()> {
    if window == 0 || min_history == 0 {
        return Err(Error::Config(format!(
            "{}.window and {}.min_history must be at least 1",
            section, section
        )));
    }
    if min_history > window {
        return Err(Error::Config(format!(
            "{}.min_history ({}) exceeds {}.window ({})",
            section, min_history, section, window
        )));
    }
    Ok(())
}
