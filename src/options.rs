use std::env;

use log::warn;
use vulkanalia::vk;

pub const DIAGNOSTICS_ENV_VAR: &str = "HELLO_VULKAN_DIAGNOSTICS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppOptions {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub application_name: String,
    pub application_version: (u32, u32, u32),
    pub engine_version: (u32, u32, u32),
    pub api_version: u32,
    /// Enables the validation layer, the debug utils extension and the debug messenger.
    pub diagnostics_enabled: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            window_title: "HelloWorld (Vulkan)".to_owned(),
            window_width: 800,
            window_height: 600,
            application_name: "HelloWorld".to_owned(),
            application_version: (1, 0, 0),
            engine_version: (1, 0, 0),
            api_version: vk::make_version(1, 0, 0),
            diagnostics_enabled: cfg!(debug_assertions),
        }
    }
}

impl AppOptions {
    /// Build default options, then let the environment override the diagnostics flag.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Ok(value) = env::var(DIAGNOSTICS_ENV_VAR) {
            match parse_flag(&value) {
                Some(enabled) => options.diagnostics_enabled = enabled,
                None => warn!("Ignoring {DIAGNOSTICS_ENV_VAR}={value:?}: expected a boolean"),
            }
        }
        options
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_hello_world_window() {
        let options = AppOptions::default();
        assert_eq!(options.window_width, 800);
        assert_eq!(options.window_height, 600);
        assert_eq!(options.application_name, "HelloWorld");
        assert_eq!(options.api_version, vk::make_version(1, 0, 0));
        assert_eq!(options.diagnostics_enabled, cfg!(debug_assertions));
    }

    #[test]
    fn flag_parsing() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" On "), Some(true));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }
}
