use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration by layering defaults, TOML, environment variables,
    /// and JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from("config/Config.toml")
    }

    /// Loads configuration from a specific TOML file.
    ///
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be parsed.
    pub fn load_from(path: &str) -> Result<AppConfig> {
        let config: AppConfig = Self::base()
            .merge(Toml::file(path))
            .merge(Env::prefixed("TOTALS_").split("__"))
            .join(Json::file("config/Config.json"))
            .extract()?;

        Ok(config)
    }

    /// Loads configuration with a profile overlay (`config/Config.{profile}.toml`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be parsed.
    pub fn load_with_profile(profile: &str) -> Result<AppConfig> {
        let config: AppConfig = Self::base()
            .merge(Toml::file("config/Config.toml"))
            .merge(Toml::file(format!("config/Config.{profile}.toml")))
            .merge(Env::prefixed("TOTALS_").split("__"))
            .join(Json::file("config/Config.json"))
            .extract()?;

        Ok(config)
    }

    fn base() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_files() {
        Jail::expect_with(|_jail| {
            let config = ConfigLoader::load().map_err(|e| e.to_string())?;
            assert_eq!(config, AppConfig::default());
            Ok(())
        });
    }

    #[test]
    fn toml_overrides_single_fields() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                "config/Config.toml",
                r#"
                [model]
                total_multiplier = 1.05

                [backtest]
                min_training_games = 10
                "#,
            )?;
            let config = ConfigLoader::load().map_err(|e| e.to_string())?;
            assert_eq!(config.model.total_multiplier, 1.05);
            assert_eq!(config.model.home_court_bonus, 3.5);
            assert_eq!(config.backtest.min_training_games, 10);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_toml() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file("config/Config.toml", "[edge]\noutlier_threshold = 10.0\n")?;
            jail.set_env("TOTALS_EDGE__OUTLIER_THRESHOLD", "8.5");
            let config = ConfigLoader::load().map_err(|e| e.to_string())?;
            assert_eq!(config.edge.outlier_threshold, 8.5);
            Ok(())
        });
    }

    #[test]
    fn profile_overlays_base_file() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file("config/Config.toml", "[model]\nhome_court_bonus = 2.0\n")?;
            jail.create_file(
                "config/Config.aggressive.toml",
                "[model]\ntotal_multiplier = 1.08\n",
            )?;
            let config = ConfigLoader::load_with_profile("aggressive").map_err(|e| e.to_string())?;
            assert_eq!(config.model.home_court_bonus, 2.0);
            assert_eq!(config.model.total_multiplier, 1.08);
            Ok(())
        });
    }
}
