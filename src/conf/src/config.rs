// Copyright (c) 2024-present, arana-db Community.  All rights reserved.
//
// Licensed to the Apache Software Foundation (ASF) under one or more
// contributor license agreements.  See the NOTICE file distributed with
// this work for additional information regarding copyright ownership.
// The ASF licenses this file to You under the Apache License, Version 2.0
// (the "License"); you may not use this file except in compliance with
// the License.  You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Deserialize;
use snafu::ResultExt;
use validator::Validate;

use crate::error::Error;

/// The intset representation cannot hold more than 2^16 entries; anything
/// configured above that is clamped.
pub const MAX_INTSET_ENTRIES_CAP: usize = 1 << 16;

//config struct define
#[derive(Debug, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    #[validate(range(min = 1, max = 128))]
    #[serde(rename = "shard-num")]
    pub shard_num: usize,

    #[validate(range(min = 1, max = 64))]
    pub databases: usize,

    #[serde(rename = "set-max-intset-entries")]
    pub set_max_intset_entries: u32,
}

//set default value for config
impl Default for Config {
    fn default() -> Self {
        Self {
            shard_num: 4,
            databases: 16,
            set_max_intset_entries: 512,
        }
    }
}

impl Config {
    //load config from file
    pub fn load(path: &str) -> Result<Self, Error> {
        let content =
            std::fs::read_to_string(path).context(crate::error::ConfigFileSnafu { path })?;
        Self::from_ini(&content)
    }

    pub fn from_ini(content: &str) -> Result<Self, Error> {
        let config: Config =
            serde_ini::from_str(content).context(crate::error::InvalidConfigSnafu {})?;

        config
            .validate()
            .map_err(|e| Error::ValidConfigFail { source: e })?;

        Ok(config)
    }

    /// Configured intset ceiling, clamped to the representation limit.
    pub fn max_intset_entries(&self) -> usize {
        (self.set_max_intset_entries as usize).min(MAX_INTSET_ENTRIES_CAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.shard_num, 4);
        assert_eq!(config.databases, 16);
        assert_eq!(config.max_intset_entries(), 512);
    }

    #[test]
    fn test_from_ini() {
        let config = Config::from_ini("shard-num=8\r\nset-max-intset-entries=4\r\n").unwrap();
        assert_eq!(config.shard_num, 8);
        assert_eq!(config.max_intset_entries(), 4);
        // untouched keys keep defaults
        assert_eq!(config.databases, 16);
    }

    #[test]
    fn test_intset_entries_clamp() {
        let config = Config::from_ini("set-max-intset-entries=1000000\r\n").unwrap();
        assert_eq!(config.max_intset_entries(), MAX_INTSET_ENTRIES_CAP);
    }

    #[test]
    fn test_invalid_shard_num_rejected() {
        assert!(Config::from_ini("shard-num=0\r\n").is_err());
    }
}
