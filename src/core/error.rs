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

//! Error types for the disassembler
//!
//! Two families of errors exist:
//!
//! - [`DisassemblerError`]: fatal errors that abort a disassembly run
//!   (symbol conflicts, malformed inputs, I/O from collaborators).
//! - [`InstructionDiagnostic`]: per-instruction, recoverable findings
//!   (reserved or invalid encodings) attached to the rendered operation.

use std::fmt;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, DisassemblerError>;

/// Kind of symbol involved in a registration conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Label,
    Object,
    Variable,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolKind::Function => "function",
            SymbolKind::Label => "label",
            SymbolKind::Object => "object",
            SymbolKind::Variable => "variable",
        };
        f.write_str(name)
    }
}

/// Fatal disassembler error
///
/// Any of these stops the whole run; no partial output is returned.
#[derive(Debug, Error)]
pub enum DisassemblerError {
    /// Two different names were proposed for the same address
    #[error("{kind} conflict at 0x{address:08X}: '{existing}' already registered, '{proposed}' proposed")]
    SymbolConflict {
        kind: SymbolKind,
        address: u32,
        existing: String,
        proposed: String,
    },

    /// Data file length is not a multiple of the instruction size
    #[error("data file '{name}' has length {length}, which is not a multiple of 4")]
    MisalignedDataFile { name: String, length: usize },

    /// Data region with an end before its start
    #[error("invalid data region 0x{start:08X}-0x{end:08X}")]
    InvalidDataRegion { start: u32, end: u32 },

    /// Cancellation was requested before the given pass started
    #[error("disassembly cancelled before the {stage} pass")]
    Cancelled { stage: &'static str },

    /// Malformed options file
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O failure in a file-backed collaborator
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Recoverable, per-instruction finding
///
/// Attached to an [`OperationRecord`](crate::core::render::OperationRecord) instead of
/// aborting the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InstructionDiagnostic {
    /// Encoding occupies a slot the architecture reserves
    #[error("reserved instruction 0x{word:08X} at 0x{address:08X}")]
    Reserved { word: u32, address: u32 },

    /// Encoding has no defined meaning
    #[error("invalid instruction 0x{word:08X} at 0x{address:08X}")]
    Invalid { word: u32, address: u32 },
}
