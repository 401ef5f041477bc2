use serde::{Deserialize, Serialize};

/// Configuration for the inventory module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventoryConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
    #[serde(default = "default_max_tid_length")]
    pub max_tid_length: usize,
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    #[serde(default = "default_max_description_length")]
    pub max_description_length: usize,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            max_tid_length: default_max_tid_length(),
            max_name_length: default_max_name_length(),
            max_description_length: default_max_description_length(),
        }
    }
}

impl InventoryConfig {
    /// Zero selects the default size; anything else is kept within `1..=max_page_size`.
    pub fn clamp_page_size(&self, requested: u64) -> u64 {
        let size = if requested == 0 {
            self.default_page_size
        } else {
            requested
        };
        size.clamp(1, self.max_page_size.max(1))
    }
}

fn default_page_size() -> u64 {
    50
}

fn default_max_page_size() -> u64 {
    1000
}

fn default_max_tid_length() -> usize {
    32
}

fn default_max_name_length() -> usize {
    100
}

fn default_max_description_length() -> usize {
    500
}
