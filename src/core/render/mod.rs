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

//! Rendering pass (pass 2)
//!
//! Walks each data file in address order and emits, per word:
//!
//! 1. `/* Object: name */` when an object starts here
//! 2. `L_XXXXXXXX:` for a plain label
//! 3. `glabel L_XXXXXXXX` for a switch case
//! 4. a blank line and `glabel name` for a function entry
//! 5. the instruction line, or a data directive outside code
//!
//! The pass only reads the symbol table and load-reference cache.

use crate::core::analysis::{LoadReferenceCache, RomVariable, Symbol, SymbolTable};
use crate::core::cpu::{Disassembler, Instruction, Relocation, SymbolResolver};
use crate::core::error::{InstructionDiagnostic, Result};
use crate::core::memory::{AddressClassifier, DataFile};

mod sink;

pub use sink::{DirectorySink, MemorySink, OutputSink, OutputUnit};

/// Lines opening every output unit
pub const HEADER: [&str; 6] = [
    ".include \"macro.inc\"",
    "",
    ".set noat",
    ".set noreorder",
    ".set gp=64",
    "",
];

/// One decoded instruction of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRecord {
    /// Name of the data file the instruction came from
    pub file: String,
    pub instruction: Instruction,
    /// Rendered assembler text, without the address comment
    pub text: String,
    /// Reserved or invalid encoding found while decoding
    pub diagnostic: Option<InstructionDiagnostic>,
}

/// Symbol lookups backed by the analysis results
struct AnalysisResolver<'a> {
    symbols: &'a SymbolTable,
    cache: &'a LoadReferenceCache,
}

impl SymbolResolver for AnalysisResolver<'_> {
    fn target_name(&self, address: u32) -> Option<String> {
        if let Some(function) = self.symbols.function(address) {
            return Some(function.display_name());
        }
        self.symbols
            .label(address)
            .map(|label| label.display_name())
    }

    fn relocation(&self, address: u32) -> Option<Relocation> {
        let reference = self.cache.get(address)?;
        let symbol = self.symbols.name_at(reference.symbol)?;
        Some(Relocation {
            kind: reference.kind,
            symbol,
            offset: reference.offset,
        })
    }
}

/// Sequential renderer over the results of the metadata pass
pub struct RenderingPass<'a> {
    classifier: &'a AddressClassifier,
    symbols: &'a SymbolTable,
    cache: &'a LoadReferenceCache,
    split_output: bool,
}

impl<'a> RenderingPass<'a> {
    pub fn new(
        classifier: &'a AddressClassifier,
        symbols: &'a SymbolTable,
        cache: &'a LoadReferenceCache,
        split_output: bool,
    ) -> Self {
        Self {
            classifier,
            symbols,
            cache,
            split_output,
        }
    }

    /// Render one file into `sink`
    ///
    /// # Arguments
    ///
    /// * `file` - File to render
    /// * `sink` - Receives one unit per file, or one per object when splitting
    ///
    /// # Returns
    ///
    /// Decoded instructions of the file in address order
    pub fn render_file(&self, file: &DataFile, sink: &mut dyn OutputSink) -> Result<Vec<OperationRecord>> {
        let resolver = AnalysisResolver {
            symbols: self.symbols,
            cache: self.cache,
        };
        let mut operations = Vec::new();

        let first_name = match self.symbols.object(file.vaddr()) {
            Some(object) if self.split_output => object.display_name(),
            _ => file.name().to_string(),
        };
        begin_unit(sink, &first_name)?;
        log::debug!("Rendering {} ({} words)", file.name(), file.len_words());

        for instr in file.instructions() {
            let address = instr.address();

            if let Some(object) = self.symbols.object(address) {
                if self.split_output && instr.index() > 0 {
                    begin_unit(sink, &object.display_name())?;
                }
                sink.emit_line(&format!("/* Object: {} */", object.display_name()))?;
            }

            let switch_case = self.symbols.is_switch_case(address);
            if let Some(label) = self.symbols.label(address) {
                if !switch_case {
                    sink.emit_line(&format!("{}:", label.display_name()))?;
                }
            }
            if switch_case {
                sink.emit_line(&format!("glabel L_{:08X}", address))?;
            }
            if let Some(function) = self.symbols.function(address) {
                sink.emit_line("")?;
                sink.emit_line(&format!("glabel {}", function.display_name()))?;
            }

            if self.classifier.is_code_region(address) {
                let rendered = Disassembler::render(&instr, &resolver);
                if let Some(diagnostic) = rendered.diagnostic {
                    log::warn!("{}", diagnostic);
                }
                sink.emit_line(&format!(
                    "/* {:06X} {:08X} {:08X} */  {}",
                    instr.index(),
                    address,
                    instr.word(),
                    rendered.text
                ))?;
                operations.push(OperationRecord {
                    file: file.name().to_string(),
                    instruction: instr,
                    text: rendered.text,
                    diagnostic: rendered.diagnostic,
                });
            } else {
                self.render_data(file, &instr, sink)?;
            }
        }

        Ok(operations)
    }

    /// Emit a data word, splitting it at variable boundaries
    fn render_data(&self, file: &DataFile, instr: &Instruction, sink: &mut dyn OutputSink) -> Result<()> {
        let address = instr.address();
        let word = instr.word();
        let variables: Vec<RomVariable> = self.symbols.variables_in(address..=address | 3);

        if variables.iter().all(|v| v.address == address) {
            if let Some(variable) = variables.first() {
                sink.emit_line(&format!("glabel {}", variable.display_name()))?;
            }
            let value = match self.word_reference(word) {
                Some(name) => name,
                None => format!("0x{:08X}", word),
            };
            return sink.emit_line(&format!(
                "/* {:06X} {:08X} {:08X} */  .word {}",
                instr.index(),
                address,
                word,
                value
            ));
        }

        // Boundaries inside the word force byte/halfword granularity
        let mut bounds: Vec<u32> = variables.iter().map(|v| v.address - address).collect();
        bounds.insert(0, 0);
        bounds.push(4);
        bounds.dedup();

        for pair in bounds.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            if let Some(variable) = variables.iter().find(|v| v.address == address + start) {
                sink.emit_line(&format!("glabel {}", variable.display_name()))?;
            }

            let mut offset = start;
            while offset < end {
                let piece = address + offset;
                let byte = |at: u32| file.byte_at(at).unwrap_or(0);
                if offset % 2 == 0 && end - offset >= 2 {
                    let half = u16::from_be_bytes([byte(piece), byte(piece + 1)]);
                    sink.emit_line(&format!("/* {:08X} */  .short 0x{:04X}", piece, half))?;
                    offset += 2;
                } else {
                    sink.emit_line(&format!("/* {:08X} */  .byte 0x{:02X}", piece, byte(piece)))?;
                    offset += 1;
                }
            }
        }

        Ok(())
    }

    /// Symbol named by a data word's value, if it points at code or a variable
    fn word_reference(&self, value: u32) -> Option<String> {
        if let Some(function) = self.symbols.function(value) {
            return Some(function.display_name());
        }
        if self.symbols.is_switch_case(value) {
            return Some(format!("L_{:08X}", value));
        }
        self.symbols
            .variable(value)
            .map(|variable| variable.display_name())
    }
}

fn begin_unit(sink: &mut dyn OutputSink, name: &str) -> Result<()> {
    sink.begin_unit(name)?;
    for line in HEADER {
        sink.emit_line(line)?;
    }
    Ok(())
}
