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

//! Metadata extraction (pass 1)
//!
//! Registers jump-table cases for every known switch table, labels and
//! functions for every instruction, then pairs `lui` instructions with their
//! low-half consumers. Both phases are
//! data-parallel over word indices; the only shared writes go through the
//! [`SymbolTable`] and [`LoadReferenceCache`].
//!
//! Phase ordering: every control-flow symbol is registered before any
//! load reference is resolved, so pairing never depends on scheduling.

use super::load_ref::{LoadReferenceCache, LoadReferenceResolver};
use super::symbols::SymbolTable;
use crate::core::cpu::Operation;
use crate::core::error::Result;
use crate::core::memory::{AddressClassifier, DataFile};
use rayon::prelude::*;

/// REGIMM `rt` codes that carry a branch offset
const REGIMM_BRANCH_CODES: [u8; 14] = [0, 1, 2, 3, 8, 9, 10, 11, 12, 14, 16, 17, 18, 19];

/// COP1 `rs` selecting the BC1 branch family
const COP1_BRANCH: u8 = 0x08;

/// Pass 1 over a set of data files
pub struct MetadataPass<'a> {
    files: &'a [DataFile],
    classifier: &'a AddressClassifier,
    symbols: &'a SymbolTable,
    cache: &'a LoadReferenceCache,
    depth: usize,
}

impl<'a> MetadataPass<'a> {
    pub fn new(
        files: &'a [DataFile],
        classifier: &'a AddressClassifier,
        symbols: &'a SymbolTable,
        cache: &'a LoadReferenceCache,
        depth: usize,
    ) -> Self {
        Self {
            files,
            classifier,
            symbols,
            cache,
            depth,
        }
    }

    /// Run both phases over every file
    ///
    /// # Returns
    ///
    /// - `Ok(())` when every symbol registered cleanly
    /// - `Err(DisassemblerError::SymbolConflict)` on the first conflicting registration
    pub fn run(&self) -> Result<()> {
        let tables = self.symbols.switch_tables();
        for file in self.files {
            for table in tables.iter().filter(|t| t.address % 4 == 0) {
                if let Some(index) = file.index_of(table.address) {
                    self.register_switch_table(file, index);
                }
            }
            (0..file.len_words())
                .into_par_iter()
                .try_for_each(|index| self.register_control_flow(file, index))?;
        }

        let counts = self.symbols.counts();
        log::debug!(
            "Control flow: {} functions, {} labels, {} switch cases",
            counts.functions,
            counts.labels,
            counts.switch_cases
        );

        for file in self.files {
            let resolver =
                LoadReferenceResolver::new(file, self.classifier, self.symbols, self.cache, self.depth);
            (0..file.len_words()).into_par_iter().for_each(|index| {
                let is_lui = file
                    .instruction(index)
                    .is_some_and(|instr| instr.operation() == Some(Operation::Lui));
                if is_lui && self.classifier.is_code_region(file.address_of(index)) {
                    resolver.resolve(index);
                }
            });
        }

        log::debug!("Resolved {} load references", self.cache.len());
        Ok(())
    }

    /// Classify one word and register what it targets
    fn register_control_flow(&self, file: &DataFile, index: usize) -> Result<()> {
        let Some(instr) = file.instruction(index) else {
            return Ok(());
        };
        let address = instr.address();

        // Words outside code never contribute control flow
        if self.classifier.is_data_or_undefined(address) {
            return Ok(());
        }

        match instr.opcode() {
            0x01 if REGIMM_BRANCH_CODES.contains(&instr.rt()) => {
                self.symbols.register_label(instr.absolute_jump_address())?;
            }
            0x02 | 0x03 => {
                self.symbols.register_function(instr.absolute_jump_address(), None)?;
            }
            0x04..=0x07 | 0x14..=0x17 => {
                self.symbols.register_label(instr.absolute_jump_address())?;
            }
            0x11 if instr.rs() == COP1_BRANCH && instr.rt() <= 3 => {
                self.symbols.register_label(instr.absolute_jump_address())?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Register every code address listed in a jump table starting at `index`
    fn register_switch_table(&self, file: &DataFile, index: usize) {
        let mut cases = 0;
        for entry in index..file.len_words() {
            let Some(target) = file.word(entry) else {
                break;
            };
            if !self.classifier.is_code_region(target) {
                break;
            }
            self.symbols.register_switch_case(target);
            cases += 1;
        }
        log::debug!(
            "Jump table at 0x{:08X}: {} cases",
            file.address_of(index),
            cases
        );
    }
}
