use crate::core::config::data::Config;
use crate::ui::thinking::DEFAULT_LABEL;

pub const DEFAULT_REGION: &str = "cn-beijing";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_BASE_URL_TEMPLATE: &str = "https://ark.{region}.volces.com/api/v3";

impl Config {
    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn base_url_template(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL_TEMPLATE)
    }

    pub fn assistant_label(&self) -> &str {
        self.assistant_label.as_deref().unwrap_or(DEFAULT_LABEL)
    }
}
