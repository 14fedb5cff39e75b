use serde::Deserialize;

use crate::services::reel::ReelSettings;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of slots in the spin reel
    #[serde(default = "default_reel_length")]
    pub reel_length: usize,

    /// Fraction of the reel after which the winner should land
    #[serde(default = "default_reel_zone_fraction")]
    pub reel_zone_fraction: f64,

    /// Optional JSON export to pre-load the store from
    #[serde(default)]
    pub seed_file: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_reel_length() -> usize {
    60
}

fn default_reel_zone_fraction() -> f64 {
    0.75
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            reel_length: default_reel_length(),
            reel_zone_fraction: default_reel_zone_fraction(),
            seed_file: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.reel_length == 0 {
            anyhow::bail!("REEL_LENGTH must be greater than zero");
        }
        if !(0.0..=1.0).contains(&self.reel_zone_fraction) {
            anyhow::bail!(
                "REEL_ZONE_FRACTION must be within [0, 1], got {}",
                self.reel_zone_fraction
            );
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn reel_settings(&self) -> ReelSettings {
        ReelSettings {
            length: self.reel_length,
            zone_fraction: self.reel_zone_fraction,
        }
    }
}
