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

//! `lui` pairing resolver
//!
//! MIPS compilers build 32-bit addresses in two halves:
//!
//! ```text
//! lui   $t0, 0x8010          # %hi(gTable)
//! ...                        # possibly across branches
//! addiu $t0, $t0, 0x1234     # %lo(gTable)
//! ```
//!
//! Starting at a `lui`, the resolver walks the instruction stream looking for
//! the instruction that consumes the low half, following branches with a
//! shared visited set and a per-path depth budget. Every pairing that can be
//! attributed to a known symbol is recorded in the [`LoadReferenceCache`],
//! keyed by the address of the instruction whose immediate is replaced.

use super::symbols::SymbolTable;
use crate::core::cpu::{Instruction, Operation, RelocationKind};
use crate::core::memory::{AddressClassifier, DataFile, KSEG0_START};
use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

/// Symbolic replacement recorded for one instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReference {
    /// Address of the symbol the constructed pointer is attributed to
    pub symbol: u32,
    /// Byte offset from the symbol
    pub offset: u32,
    pub kind: RelocationKind,
    /// `lui` that started the pairing
    pub lui_address: u32,
}

/// Instruction address -> symbolic reference
///
/// Populated during the metadata pass and read-only afterwards. When two
/// `lui` instructions pair with the same consumer, the pairing started by the
/// lowest `lui` address is kept, so the result does not depend on scheduling.
#[derive(Debug, Default)]
pub struct LoadReferenceCache {
    entries: RwLock<HashMap<u32, LoadReference>>,
}

impl LoadReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reference for the instruction at `address`
    pub fn insert(&self, address: u32, reference: LoadReference) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry(address)
            .and_modify(|existing| {
                if reference.lui_address < existing.lui_address {
                    *existing = reference;
                }
            })
            .or_insert(reference);
    }

    pub fn get(&self, address: u32) -> Option<LoadReference> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&address)
            .copied()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of examining one instruction on a walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Keep walking
    Continue,
    /// The tracked register was consumed and overwritten by a completion
    Completed,
    /// The tracked register was overwritten by something unrelated
    Clobbered,
}

/// Resolver over one data file
pub struct LoadReferenceResolver<'a> {
    file: &'a DataFile,
    classifier: &'a AddressClassifier,
    symbols: &'a SymbolTable,
    cache: &'a LoadReferenceCache,
    /// Maximum instructions examined per path
    depth: usize,
}

impl<'a> LoadReferenceResolver<'a> {
    pub fn new(
        file: &'a DataFile,
        classifier: &'a AddressClassifier,
        symbols: &'a SymbolTable,
        cache: &'a LoadReferenceCache,
        depth: usize,
    ) -> Self {
        Self {
            file,
            classifier,
            symbols,
            cache,
            depth,
        }
    }

    /// Resolve the `lui` at word `index`
    ///
    /// Non-`lui` words are ignored. Misses are silent: the instructions simply
    /// keep their numeric immediates.
    pub fn resolve(&self, index: usize) {
        let Some(lui) = self.file.instruction(index) else {
            return;
        };
        if lui.operation() != Some(Operation::Lui) {
            return;
        }

        let register = lui.rt();
        let mut visited = HashSet::new();
        let mut walk_straight = true;

        // A lui in a branch delay slot also runs on the taken path
        if let Some(prev) = index.checked_sub(1).and_then(|i| self.file.instruction(i)) {
            if let Some(op) = prev.operation().filter(|op| op.is_branch()) {
                if let Some(target) = self.file.index_of(prev.branch_target()) {
                    self.walk(&lui, register, target, 0, &mut visited);
                }
                // Likely delay slots only execute when taken
                if op.is_likely() {
                    walk_straight = false;
                }
            }
        }

        if walk_straight {
            self.walk(&lui, register, index + 1, 0, &mut visited);
        }
    }

    /// Forward walk from word `start`
    ///
    /// `depth` counts instructions already examined on this path.
    fn walk(
        &self,
        lui: &Instruction,
        register: u8,
        start: usize,
        mut depth: usize,
        visited: &mut HashSet<u32>,
    ) {
        let mut index = start;

        loop {
            if depth >= self.depth {
                return;
            }
            let Some(instr) = self.file.instruction(index) else {
                return;
            };
            let address = instr.address();
            if self.classifier.is_data_region(address) || !visited.insert(address) {
                return;
            }
            depth += 1;

            if self.examine(lui, register, &instr) != Step::Continue {
                return;
            }

            let Some(op) = instr.operation() else {
                index += 1;
                continue;
            };

            if op.is_jump() || is_always_taken(&instr, op) {
                // Control does not fall through; only the delay slot still runs
                self.examine_delay_slot(lui, register, index + 1);
                return;
            }

            if op.is_branch() {
                let target = self.file.index_of(instr.branch_target());
                if op.is_likely() {
                    // Taken: delay slot, then target. Not taken: slot is skipped.
                    if self.examine_delay_slot(lui, register, index + 1) == Step::Continue {
                        if let Some(target) = target {
                            self.walk(lui, register, target, depth + 1, visited);
                        }
                    }
                } else {
                    if self.examine_delay_slot(lui, register, index + 1) != Step::Continue {
                        return;
                    }
                    if let Some(target) = target {
                        self.walk(lui, register, target, depth + 1, visited);
                    }
                }
                index += 2;
                depth += 1;
                continue;
            }

            index += 1;
        }
    }

    fn examine_delay_slot(&self, lui: &Instruction, register: u8, index: usize) -> Step {
        match self.file.instruction(index) {
            Some(slot) if !self.classifier.is_data_region(slot.address()) => {
                self.examine(lui, register, &slot)
            }
            _ => Step::Continue,
        }
    }

    /// Check one instruction for completing or clobbering the tracked register
    fn examine(&self, lui: &Instruction, register: u8, instr: &Instruction) -> Step {
        let Some(op) = instr.operation() else {
            return Step::Continue;
        };
        let writes_register = op.gpr_destination(instr.word()) == Some(register);

        if is_completion(op, instr, register) {
            let high = u32::from(lui.immediate()) << 16;
            let address = high.wrapping_add(instr.signed_immediate() as u32);
            self.record(lui, instr, address);
            return if writes_register {
                Step::Completed
            } else {
                Step::Continue
            };
        }

        if writes_register {
            Step::Clobbered
        } else {
            Step::Continue
        }
    }

    /// Attribute a constructed address and cache both halves
    fn record(&self, lui: &Instruction, completion: &Instruction, address: u32) {
        if address < KSEG0_START {
            return;
        }

        let attribution = if self.symbols.function(address).is_some() {
            Some((address, 0))
        } else {
            self.symbols.variable_offset(address)
        };
        let Some((symbol, offset)) = attribution else {
            return;
        };

        log::trace!(
            "Paired lui at 0x{:08X} with 0x{:08X}: 0x{:08X} = 0x{:08X} + 0x{:X}",
            lui.address(),
            completion.address(),
            address,
            symbol,
            offset
        );

        self.cache.insert(
            completion.address(),
            LoadReference {
                symbol,
                offset,
                kind: RelocationKind::Lo,
                lui_address: lui.address(),
            },
        );
        self.cache.insert(
            lui.address(),
            LoadReference {
                symbol,
                offset,
                kind: RelocationKind::Hi,
                lui_address: lui.address(),
            },
        );
    }
}

/// `addiu` from the register, or a load/store using it as base
fn is_completion(op: Operation, instr: &Instruction, register: u8) -> bool {
    if instr.rs() != register {
        return false;
    }
    op == Operation::Addiu || (instr.opcode() > 31 && op.is_load_or_store())
}

/// `beq $zero, $zero`, `bgez $zero`, `bal` (and their likely forms) always branch
fn is_always_taken(instr: &Instruction, op: Operation) -> bool {
    match op {
        Operation::Beq | Operation::Beql => instr.rs() == instr.rt(),
        Operation::Bgez | Operation::Bgezl | Operation::Blez | Operation::Blezl => instr.rs() == 0,
        Operation::Bgezal | Operation::Bgezall => instr.rs() == 0,
        _ => false,
    }
}
