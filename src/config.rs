use serde::{Deserialize, Serialize};

use crate::components::force_graph::RenderConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("invalid config: {0}")]
	Parse(#[from] serde_json::Error),

	#[error("node_cap must be at least 1")]
	ZeroNodeCap,
}

/// Application settings. Missing fields fall back to their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	/// Base URL of the max-clique service.
	pub api_base_url: String,
	pub render: RenderConfig,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base_url: "http://localhost:8080".into(),
			render: RenderConfig::default(),
		}
	}
}

impl AppConfig {
	pub fn from_json(text: &str) -> Result<Self, ConfigError> {
		let config: Self = serde_json::from_str(text)?;
		if config.render.node_cap == 0 {
			return Err(ConfigError::ZeroNodeCap);
		}
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_object_is_default() {
		assert_eq!(AppConfig::from_json("{}").unwrap(), AppConfig::default());
	}

	#[test]
	fn partial_override_keeps_other_defaults() {
		let config = AppConfig::from_json(
			r##"{ "api_base_url": "https://clique.example", "render": { "node_cap": 250, "highlight_node_color": "#00ff00" } }"##,
		)
		.unwrap();
		assert_eq!(config.api_base_url, "https://clique.example");
		assert_eq!(config.render.node_cap, 250);
		assert_eq!(config.render.highlight_node_color, "#00ff00");
		assert_eq!(config.render.base_node_size, 3.0);
		assert_eq!(config.render.label_zoom_threshold, 0.5);
	}

	#[test]
	fn rejects_bad_input() {
		assert!(matches!(
			AppConfig::from_json(r#"{ "render": { "node_cap": 0 } }"#),
			Err(ConfigError::ZeroNodeCap)
		));
		assert!(matches!(AppConfig::from_json("[1, 2]"), Err(ConfigError::Parse(_))));
	}
}
