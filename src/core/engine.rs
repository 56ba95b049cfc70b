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

//! Disassembly engine
//!
//! Runs the two passes over a set of data files:
//!
//! 1. seed the symbol table from the options, then the metadata pass
//!    (parallel) registers labels, functions, switch cases and load references
//! 2. the rendering pass (sequential, per file) writes output units
//!
//! Every run starts from fresh state, so running twice on the same input
//! yields identical output.

use crate::core::analysis::{LoadReferenceCache, MetadataPass, SymbolTable};
use crate::core::config::DisassemblerOptions;
use crate::core::error::{DisassemblerError, Result};
use crate::core::memory::{AddressClassifier, DataFile};
use crate::core::render::{MemorySink, OperationRecord, OutputSink, OutputUnit, RenderingPass};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disassembly {
    /// Decoded instructions of every file, in file then address order
    pub operations: Vec<OperationRecord>,
    /// Rendered output units
    pub units: Vec<OutputUnit>,
}

impl Disassembly {
    /// Every unit concatenated, in order
    pub fn text(&self) -> String {
        self.units.iter().map(OutputUnit::text).collect()
    }
}

/// Two-pass MIPS disassembler
///
/// # Example
/// ```
/// use n64dis::core::config::DisassemblerOptions;
/// use n64dis::core::engine::Disassembler;
/// use n64dis::core::memory::DataFile;
///
/// // lui $t0, 0x8010; addiu $t0, $t0, 0x1234; lw $t1, 0($t0); jr $ra
/// let file = DataFile::from_words(
///     "code",
///     &[0x3C088010, 0x25081234, 0x8D090000, 0x03E00008, 0],
///     0x80000000,
/// );
/// let options = DisassemblerOptions::new().with_variable(0x80101234, "gTable", 0);
///
/// let result = Disassembler::new(options).disassemble(&[file]).unwrap();
/// assert_eq!(result.operations[0].text, "lui $t0, %hi(gTable)");
/// assert_eq!(result.operations[1].text, "addiu $t0, $t0, %lo(gTable)");
/// ```
pub struct Disassembler {
    options: DisassemblerOptions,
    /// Cooperative cancellation, checked between passes
    cancel: Option<Arc<AtomicBool>>,
}

impl Disassembler {
    pub fn new(options: DisassemblerOptions) -> Self {
        Self {
            options,
            cancel: None,
        }
    }

    /// Attach a cancellation flag
    ///
    /// Setting the flag makes the next pass boundary fail with
    /// [`DisassemblerError::Cancelled`]. Passes already running finish first.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn options(&self) -> &DisassemblerOptions {
        &self.options
    }

    /// Disassemble into memory
    ///
    /// # Returns
    ///
    /// - `Ok(Disassembly)` with every operation and output unit
    /// - `Err(DisassemblerError)` on symbol conflicts, invalid options or cancellation
    pub fn disassemble(&self, files: &[DataFile]) -> Result<Disassembly> {
        let mut sink = MemorySink::new();
        let operations = self.disassemble_into(files, &mut sink)?;
        Ok(Disassembly {
            operations,
            units: sink.into_units(),
        })
    }

    /// Disassemble, streaming output units into `sink`
    ///
    /// # Arguments
    ///
    /// * `files` - Data files to disassemble
    /// * `sink` - Receives the rendered units
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<OperationRecord>)` on success
    /// - `Err(DisassemblerError)` on the first fatal error; nothing is written
    ///   to `sink` when the metadata pass fails
    pub fn disassemble_into(
        &self,
        files: &[DataFile],
        sink: &mut dyn OutputSink,
    ) -> Result<Vec<OperationRecord>> {
        let regions = self.options.regions()?;
        let classifier = AddressClassifier::new(files, &regions);

        self.check_cancelled("metadata")?;
        let symbols = SymbolTable::seeded(&self.options, &classifier)?;
        let cache = LoadReferenceCache::new();

        log::info!(
            "Metadata pass: {} files, {} data regions",
            files.len(),
            regions.len()
        );
        MetadataPass::new(
            files,
            &classifier,
            &symbols,
            &cache,
            self.options.load_reference_depth,
        )
        .run()?;

        let counts = symbols.counts();
        log::info!(
            "Discovered {} functions, {} labels, {} switch cases, {} load references",
            counts.functions,
            counts.labels,
            counts.switch_cases,
            cache.len()
        );

        self.check_cancelled("rendering")?;
        let pass = RenderingPass::new(&classifier, &symbols, &cache, self.options.split_output);
        let mut operations = Vec::new();
        for file in files {
            operations.extend(pass.render_file(file, sink)?);
        }
        sink.finish()?;

        let diagnostics = operations.iter().filter(|op| op.diagnostic.is_some()).count();
        log::info!(
            "Rendered {} instructions ({} reserved/invalid)",
            operations.len(),
            diagnostics
        );
        Ok(operations)
    }

    fn check_cancelled(&self, stage: &'static str) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Acquire) => {
                log::info!("Cancelled before the {} pass", stage);
                Err(DisassemblerError::Cancelled { stage })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_before_metadata() {
        let flag = Arc::new(AtomicBool::new(true));
        let engine = Disassembler::new(DisassemblerOptions::new()).with_cancellation(flag);
        let file = DataFile::from_words("f", &[0], 0x80000000);
        let err = engine.disassemble(&[file]).unwrap_err();
        assert!(matches!(
            err,
            DisassemblerError::Cancelled { stage: "metadata" }
        ));
    }

    #[test]
    fn test_not_cancelled_runs() {
        let flag = Arc::new(AtomicBool::new(false));
        let engine = Disassembler::new(DisassemblerOptions::new()).with_cancellation(flag);
        let file = DataFile::from_words("f", &[0], 0x80000000);
        let result = engine.disassemble(&[file]).unwrap();
        assert_eq!(result.operations.len(), 1);
        assert_eq!(result.units.len(), 1);
    }

    #[test]
    fn test_invalid_region_in_options() {
        let options = DisassemblerOptions::new().with_data_region(0x80000010, 0x80000000);
        let err = Disassembler::new(options).disassemble(&[]).unwrap_err();
        assert!(matches!(err, DisassemblerError::InvalidDataRegion { .. }));
    }

    #[test]
    fn test_no_files() {
        let result = Disassembler::new(DisassemblerOptions::new())
            .disassemble(&[])
            .unwrap();
        assert!(result.operations.is_empty());
        assert!(result.units.is_empty());
    }
}
