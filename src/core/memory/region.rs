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

//! Data region identification
//!
//! Answers whether an address is data, code or undefined. Anything not
//! provably code is reported as data-or-undefined, so unknown memory renders
//! as data directives instead of being disassembled.

use super::DataFile;
use crate::core::error::{DisassemblerError, Result};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Inclusive address range that is never disassembled as instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataRegion {
    start: u32,
    end: u32,
}

impl DataRegion {
    /// Create a region covering `start..=end`
    ///
    /// # Returns
    ///
    /// - `Ok(DataRegion)` when `end >= start`
    /// - `Err(DisassemblerError::InvalidDataRegion)` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use n64dis::core::memory::DataRegion;
    ///
    /// let region = DataRegion::new(0x80001000, 0x800010FF).unwrap();
    /// assert!(region.contains(0x800010FF));
    /// assert!(DataRegion::new(0x80001000, 0x80000FFF).is_err());
    /// ```
    pub fn new(start: u32, end: u32) -> Result<Self> {
        if end < start {
            return Err(DisassemblerError::InvalidDataRegion { start, end });
        }
        Ok(Self { start, end })
    }

    #[inline]
    pub fn start(&self) -> u32 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> u32 {
        self.end
    }

    #[inline]
    pub fn contains(&self, address: u32) -> bool {
        (self.start..=self.end).contains(&address)
    }
}

/// Memoizing address classifier
///
/// Safe to share across the parallel metadata pass. Each cache entry is
/// written at most once; racing writers compute the same value and the first
/// insert wins.
#[derive(Debug, Default)]
pub struct AddressClassifier {
    /// Caller-declared data regions
    regions: Vec<DataRegion>,

    /// Byte spans of the loaded data files as `(start, exclusive end)`
    spans: Vec<(u32, u64)>,

    /// address -> inside a data region
    data_cache: RwLock<HashMap<u32, bool>>,

    /// address -> inside a file and not a data region
    code_cache: RwLock<HashMap<u32, bool>>,
}

impl AddressClassifier {
    /// Create a classifier for a set of files and declared data regions
    pub fn new(files: &[DataFile], regions: &[DataRegion]) -> Self {
        Self {
            regions: regions.to_vec(),
            spans: files
                .iter()
                .map(|file| (file.vaddr(), file.end_address()))
                .collect(),
            data_cache: RwLock::new(HashMap::new()),
            code_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Declared data regions
    pub fn regions(&self) -> &[DataRegion] {
        &self.regions
    }

    /// True if any declared data region contains `address`
    pub fn is_data_region(&self, address: u32) -> bool {
        memoize(&self.data_cache, address, || {
            self.regions.iter().any(|region| region.contains(address))
        })
    }

    /// True if `address` lies inside a loaded file and outside every data region
    pub fn is_code_region(&self, address: u32) -> bool {
        memoize(&self.code_cache, address, || {
            let in_file = self
                .spans
                .iter()
                .any(|&(start, end)| address >= start && u64::from(address) < end);
            in_file && !self.is_data_region(address)
        })
    }

    /// True unless `address` is provably code
    #[inline]
    pub fn is_data_or_undefined(&self, address: u32) -> bool {
        !self.is_code_region(address)
    }
}

/// Check-then-insert lookup against a shared cache
fn memoize(cache: &RwLock<HashMap<u32, bool>>, address: u32, compute: impl FnOnce() -> bool) -> bool {
    let cached = cache
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&address)
        .copied();
    if let Some(value) = cached {
        return value;
    }

    let value = compute();
    *cache
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(address)
        .or_insert(value)
}
