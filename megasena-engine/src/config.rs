use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Poids des six composantes du score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub frequency: f64,
    pub combination: f64,
    pub distribution: f64,
    pub sum: f64,
    pub composition: f64,
    pub sequence: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            frequency: 0.20,
            combination: 0.25,
            distribution: 0.15,
            sum: 0.15,
            composition: 0.15,
            sequence: 0.10,
        }
    }
}

/// Paramètres ajustables de l'analyse, du score et du générateur.
///
/// Ce sont des constantes empiriques, à recalibrer : aucune n'est dérivée
/// d'un modèle statistique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Analyse
    pub recent_window: usize,
    pub hot_window: usize,
    pub recent_multiplier: f64,
    pub pair_scale: f64,
    pub recent_pair_scale: f64,

    // Score
    pub weights: ScoreWeights,
    pub frequency_total_factor: f64,
    pub frequency_recent_factor: f64,
    pub combination_historical_share: f64,
    pub combination_recent_share: f64,
    pub combination_pair_share: f64,
    pub combination_triple_share: f64,
    pub combination_amplifier: f64,
    pub sum_sigma_limit: f64,
    pub sequence_penalty: f64,
    pub duplicate_factor: f64,
    pub hot_boost: f64,
    pub cold_penalty: f64,
    pub similarity_threshold: f64,
    pub similarity_boost: f64,
    pub fallback_score: f64,

    // Générateur
    pub hot_fraction: f64,
    pub frequency_fraction: f64,
    pub frequency_weight: f64,
    pub pair_weight: f64,
    pub triple_weight: f64,

    // Lots de grilles
    pub max_cards: usize,
    pub size_bonus_per_number: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recent_window: 20,
            hot_window: 30,
            recent_multiplier: 2.0,
            pair_scale: 10.0,
            recent_pair_scale: 20.0,

            weights: ScoreWeights::default(),
            frequency_total_factor: 1.5,
            frequency_recent_factor: 2.5,
            combination_historical_share: 0.4,
            combination_recent_share: 0.6,
            combination_pair_share: 0.6,
            combination_triple_share: 0.4,
            combination_amplifier: 1.5,
            sum_sigma_limit: 3.0,
            sequence_penalty: 20.0,
            duplicate_factor: 0.5,
            hot_boost: 30.0,
            cold_penalty: 15.0,
            similarity_threshold: 0.7,
            similarity_boost: 60.0,
            fallback_score: 50.0,

            hot_fraction: 0.3,
            frequency_fraction: 0.7,
            frequency_weight: 3.0,
            pair_weight: 2.0,
            triple_weight: 3.0,

            max_cards: 10,
            size_bonus_per_number: 0.15,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if self.recent_window == 0 || self.hot_window == 0 {
            return Err(EngineError::Config("les fenêtres doivent être non nulles".into()));
        }
        if !(0.0..=1.0).contains(&self.hot_fraction) || !(0.0..=1.0).contains(&self.frequency_fraction) {
            return Err(EngineError::Config("les fractions du générateur doivent être dans [0, 1]".into()));
        }
        if self.max_cards == 0 {
            return Err(EngineError::Config("max_cards doit être au moins 1".into()));
        }
        Ok(())
    }
}

pub fn save_config(config: &EngineConfig, path: &Path) -> EngineResult<()> {
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| EngineError::Config(e.to_string()))?;
    std::fs::write(path, json)
        .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
    Ok(())
}

pub fn load_config(path: &Path) -> EngineResult<EngineConfig> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
    let config: EngineConfig = serde_json::from_str(&json)
        .map_err(|e| EngineError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.recent_window, 20);
        assert_eq!(config.hot_window, 30);
        let w = &config.weights;
        let total = w.frequency + w.combination + w.distribution + w.sum + w.composition + w.sequence;
        assert!((total - 1.0).abs() < 1e-10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");

        let mut config = EngineConfig::default();
        config.similarity_boost = 40.0;
        save_config(&config, &path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{ "hot_window": 10, "weights": { "sequence": 0.5 } }"#).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.hot_window, 10);
        assert_eq!(loaded.recent_window, 20);
        assert!((loaded.weights.sequence - 0.5).abs() < 1e-10);
        assert!((loaded.weights.frequency - 0.20).abs() < 1e-10);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{ "recent_window": 0 }"#).unwrap();
        assert!(matches!(load_config(&path), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("/nonexistent/engine.json");
        assert!(matches!(load_config(path), Err(EngineError::Config(_))));
    }
}
