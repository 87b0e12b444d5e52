use serde::Deserialize;
use std::path::PathBuf;

pub const SDK_PATH_ENV_VARS: [&str; 2] = ["ARKRES_SDK_PATH", "OHOS_SDK_PATH"];

/// User-facing settings, read from LSP initialization options,
/// `workspace/didChangeConfiguration`, or CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub sdk_path: Option<PathBuf>,
    pub resource_function: String,
    pub rawfile_function: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sdk_path: None,
            resource_function: "$r".to_string(),
            rawfile_function: "$rawfile".to_string(),
        }
    }
}

impl Settings {
    /// Accepts either the settings object itself or one nested under `arkres`.
    pub fn from_json(value: Option<&serde_json::Value>) -> Self {
        let Some(value) = value else {
            return Self::default();
        };
        let section = value.get("arkres").unwrap_or(value);
        match serde_json::from_value::<Settings>(section.clone()) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring malformed settings: {}", e);
                Self::default()
            }
        }
    }

    /// The configured SDK path, falling back to the environment.
    pub fn resolved_sdk_path(&self) -> Option<PathBuf> {
        self.sdk_path.clone().or_else(|| {
            SDK_PATH_ENV_VARS
                .iter()
                .filter_map(|var| std::env::var_os(var))
                .find(|v| !v.is_empty())
                .map(PathBuf::from)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_settings_nested_section() {
        let value = json!({ "arkres": { "sdkPath": "/opt/sdk" } });
        let settings = Settings::from_json(Some(&value));
        assert_eq!(settings.sdk_path, Some(PathBuf::from("/opt/sdk")));
        assert_eq!(settings.resource_function, "$r");
    }

    #[test]
    fn test_settings_flat_and_missing() {
        let value = json!({ "sdkPath": "/sdk", "rawfileFunction": "$raw" });
        let settings = Settings::from_json(Some(&value));
        assert_eq!(settings.sdk_path, Some(PathBuf::from("/sdk")));
        assert_eq!(settings.rawfile_function, "$raw");
        assert_eq!(Settings::from_json(None), Settings::default());
    }

    #[test]
    fn test_settings_malformed_falls_back() {
        let value = json!({ "sdkPath": 42 });
        assert_eq!(Settings::from_json(Some(&value)), Settings::default());
    }
}
