// Copyright 2025 VDisplay Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Registry configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;
use vdisplay_core::DisplayResult;

/// Runtime policy for a [`crate::DeviceRegistry`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Upper bound on simultaneously live devices
    pub max_devices: usize,
    /// Accepted HiDPI scales for descriptors that declare no override
    pub default_scales: Vec<u32>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            max_devices: 16,
            default_scales: vec![1, 2],
        }
    }
}

/// Registry configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfigFile {
    pub registry: RegistryConfig,
}

impl RegistryConfigFile {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> DisplayResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RegistryConfigFile = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> DisplayResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_allow_standard_and_double_density() {
        let config = RegistryConfig::default();
        assert_eq!(config.default_scales, vec![1, 2]);
        assert_eq!(config.max_devices, 16);
    }

    #[test]
    fn config_file_round_trips_through_json() {
        let file = RegistryConfigFile {
            registry: RegistryConfig {
                max_devices: 4,
                default_scales: vec![1],
            },
        };
        let json = serde_json::to_string(&file).unwrap();
        let parsed: RegistryConfigFile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.registry.max_devices, 4);
        assert_eq!(parsed.registry.default_scales, vec![1]);
    }
}
