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

//! n64dis: a symbol-aware MIPS R4300i (N64) disassembler
//!
//! Turns normalized, big-endian code buffers into assembler source while
//! recovering what the raw bytes leave implicit: function entry points,
//! branch labels, jump-table cases and `%hi`/`%lo` pointer pairs.
//!
//! # Architecture
//!
//! - [`core::cpu`]: bitfield decoding, the operation catalog and rendering rules
//! - [`core::memory`]: data files and data/code classification
//! - [`core::analysis`]: the parallel metadata pass and the `lui` pairing resolver
//! - [`core::render`]: the sequential rendering pass and output sinks
//! - [`core::engine`]: the pipeline tying both passes together
//!
//! # Example
//!
//! ```
//! use n64dis::core::config::DisassemblerOptions;
//! use n64dis::core::engine::Disassembler;
//! use n64dis::core::memory::DataFile;
//!
//! // beq $zero, $zero, +3 at 0x80000010
//! let words = [0, 0, 0, 0, 0x10000003, 0, 0, 0, 0];
//! let file = DataFile::from_words("boot", &words, 0x80000000);
//!
//! let result = Disassembler::new(DisassemblerOptions::new()).disassemble(&[file])?;
//! assert!(result.text().contains("L_80000020:"));
//! # Ok::<(), n64dis::DisassemblerError>(())
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`core::error::Result<T>`] which is an alias for
//! `Result<T, DisassemblerError>`. Reserved and invalid encodings are not
//! errors: they are attached to the affected instruction as an
//! [`core::error::InstructionDiagnostic`].

pub mod core;

// Re-export commonly used types
pub use core::config::DisassemblerOptions;
pub use core::engine::{Disassembler, Disassembly};
pub use core::error::{DisassemblerError, Result};
pub use core::memory::DataFile;
