use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const API_KEY_PLACEHOLDER: &str = "your-gemini-api-key-here";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub chat: ChatDefaults,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatDefaults {
    #[serde(default = "ChatDefaults::default_model")]
    pub model: String,
    /// Number of transcript turns sent with each completion request
    #[serde(default = "ChatDefaults::default_history_window")]
    pub history_window: usize,
}

impl Default for ChatDefaults {
    fn default() -> Self {
        Self {
            model: Self::default_model(),
            history_window: Self::default_history_window(),
        }
    }
}

impl ChatDefaults {
    fn default_model() -> String {
        "gemini-flash-latest".to_string()
    }

    const fn default_history_window() -> usize {
        10
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub gemini: ProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
}

impl Config {
    /// Load config from `~/gemchat/config.json`.
    ///
    /// A missing file is not an error: the app also works from environment
    /// variables alone, so defaults are returned instead.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");

        if !config_path.exists() {
            tracing::info!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = serde_json::from_str(&content)?;

        Ok(config)
    }

    /// Resolve the Gemini API key.
    ///
    /// Order: config file, then `GEMINI_API_KEY`, then `GOOGLE_API_KEY`.
    pub fn gemini_api_key(&self) -> anyhow::Result<String> {
        let configured = self.providers.gemini.api_key.trim();
        if !configured.is_empty() && configured != API_KEY_PLACEHOLDER {
            return Ok(configured.to_string());
        }

        for var in ["GEMINI_API_KEY", "GOOGLE_API_KEY"] {
            if let Ok(key) = std::env::var(var) {
                if !key.trim().is_empty() {
                    return Ok(key);
                }
            }
        }

        anyhow::bail!(
            "No Gemini API key found. Set providers.gemini.api_key in \
             ~/gemchat/config.json or export GEMINI_API_KEY."
        )
    }

    fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("gemchat"))
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, Self::template())?;

        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Next steps:");
        println!("   1. Edit the config file and add your Gemini API key");
        println!("      (or export GEMINI_API_KEY instead)");
        println!("   2. Run 'gemchat chat' to start a conversation");
        println!();
        println!("Configuration options:");
        println!("   - chat.model: Gemini model to use (gemini-flash-latest, etc.)");
        println!("   - chat.history_window: turns sent with each request");
        println!();
        Ok(())
    }

    fn template() -> &'static str {
        r#"{
  "chat": {
    "model": "gemini-flash-latest",
    "history_window": 10
  },
  "providers": {
    "gemini": {
      "api_key": "your-gemini-api-key-here"
    }
  }
}"#
    }
}
