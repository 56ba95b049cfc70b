// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
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

//! Disassembler options
//!
//! Known symbols, data regions and output settings. Options can be built in
//! code or loaded from a TOML file:
//!
//! ```toml
//! split_output = true
//! load_reference_depth = 200
//!
//! [[functions]]
//! address = 0x80000400
//! name = "main"
//!
//! [[variables]]
//! address = 0x80101234
//! name = "gTable"
//! size = 16
//!
//! [[objects]]
//! address = 0x80000400
//! name = "boot"
//!
//! [[data_regions]]
//! start = 0x80200000
//! end = 0x802000FF
//! ```

use crate::core::error::{DisassemblerError, Result};
use crate::core::memory::DataRegion;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default forward-walk budget of the load-reference resolver
pub const DEFAULT_LOAD_REFERENCE_DEPTH: usize = 200;

/// Function the caller already knows by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KnownFunction {
    pub address: u32,
    pub name: String,
}

/// Data symbol the caller already knows by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KnownVariable {
    pub address: u32,
    pub name: String,
    /// Size in bytes, 0 when unknown
    #[serde(default)]
    pub size: u32,
}

/// Output-unit boundary the caller already knows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KnownObject {
    pub address: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

/// Inclusive data range as written in the options file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataRegionEntry {
    pub start: u32,
    pub end: u32,
}

/// Options for one disassembly run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DisassemblerOptions {
    /// Start a new output unit at every object
    pub split_output: bool,

    /// Maximum instructions walked per resolver path
    pub load_reference_depth: usize,

    pub functions: Vec<KnownFunction>,
    pub variables: Vec<KnownVariable>,
    pub objects: Vec<KnownObject>,
    pub data_regions: Vec<DataRegionEntry>,
}

impl Default for DisassemblerOptions {
    fn default() -> Self {
        Self {
            split_output: false,
            load_reference_depth: DEFAULT_LOAD_REFERENCE_DEPTH,
            functions: Vec::new(),
            variables: Vec::new(),
            objects: Vec::new(),
            data_regions: Vec::new(),
        }
    }
}

impl DisassemblerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a known function
    pub fn with_function(mut self, address: u32, name: impl Into<String>) -> Self {
        self.functions.push(KnownFunction {
            address,
            name: name.into(),
        });
        self
    }

    /// Add a known variable
    pub fn with_variable(mut self, address: u32, name: impl Into<String>, size: u32) -> Self {
        self.variables.push(KnownVariable {
            address,
            name: name.into(),
            size,
        });
        self
    }

    /// Add a known object
    pub fn with_object(mut self, address: u32, name: Option<&str>, size: Option<u32>) -> Self {
        self.objects.push(KnownObject {
            address,
            name: name.map(str::to_string),
            size,
        });
        self
    }

    /// Add a data region
    ///
    /// Bounds are validated when the regions are materialized, see [`Self::regions`].
    pub fn with_data_region(mut self, start: u32, end: u32) -> Self {
        self.data_regions.push(DataRegionEntry { start, end });
        self
    }

    pub fn with_split_output(mut self, split: bool) -> Self {
        self.split_output = split;
        self
    }

    /// Validated data regions
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<DataRegion>)` when every entry satisfies `end >= start`
    /// - `Err(DisassemblerError::InvalidDataRegion)` for the first reversed entry
    pub fn regions(&self) -> Result<Vec<DataRegion>> {
        self.data_regions
            .iter()
            .map(|entry| DataRegion::new(entry.start, entry.end))
            .collect()
    }

    /// Load options from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the options file
    ///
    /// # Returns
    ///
    /// - `Ok(DisassemblerOptions)` on success
    /// - `Err(DisassemblerError::Io)` if the file cannot be read
    /// - `Err(DisassemblerError::Config)` if it does not parse
    /// - `Err(DisassemblerError::InvalidDataRegion)` if a region is reversed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let options = Self::from_toml(&contents)?;
        log::info!(
            "Loaded options from {}: {} functions, {} variables, {} objects, {} data regions",
            path.as_ref().display(),
            options.functions.len(),
            options.variables.len(),
            options.objects.len(),
            options.data_regions.len()
        );
        Ok(options)
    }

    /// Parse options from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let options: Self = toml::from_str(contents)
            .map_err(|e| DisassemblerError::Config(format!("Failed to parse options: {}", e)))?;
        options.regions()?;
        Ok(options)
    }

    /// Save options to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| {
            DisassemblerError::Config(format!("Failed to serialize options: {}", e))
        })?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
