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

//! Input buffers and address-space classification
//!
//! A [`DataFile`] is one contiguous, already-normalized big-endian buffer
//! loaded at a known virtual base address. The disassembler never mutates it.
//!
//! # Address Space
//!
//! N64 code normally lives in the MIPS kernel segments:
//! - KSEG0 (0x80000000-0x9FFFFFFF): cached, where RDRAM code and data live
//! - KSEG1 (0xA0000000-0xBFFFFFFF): uncached mirror, used by boot code
//!
//! Addresses at or above 0x80000000 are therefore treated as plausible
//! pointers by the load-reference resolver.
//!
//! # Example
//!
//! ```
//! use n64dis::core::memory::DataFile;
//!
//! // jr $ra; nop
//! let file = DataFile::new("boot", vec![0x03, 0xE0, 0x00, 0x08, 0, 0, 0, 0], 0x80000400).unwrap();
//! assert_eq!(file.len_words(), 2);
//! assert_eq!(file.word_at(0x80000400), Some(0x03E00008));
//! assert!(!file.contains(0x80000408));
//! ```

use crate::core::cpu::Instruction;
use crate::core::error::{DisassemblerError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

// Sub-modules
mod region;

// Re-export public types
pub use region::{AddressClassifier, DataRegion};

/// Lowest address considered a plausible pointer (start of KSEG0)
pub const KSEG0_START: u32 = 0x8000_0000;

/// Named, immutable byte buffer with a virtual base address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFile {
    /// Name used for the output unit
    name: String,

    /// Raw big-endian bytes
    ///
    /// Length is always a multiple of 4
    bytes: Vec<u8>,

    /// Virtual address of the first byte
    vaddr: u32,
}

impl DataFile {
    /// Create a data file from a byte buffer
    ///
    /// # Arguments
    ///
    /// * `name` - File name, used to name output units
    /// * `bytes` - Big-endian instruction/data bytes
    /// * `vaddr` - Virtual address of the first byte
    ///
    /// # Returns
    ///
    /// - `Ok(DataFile)` on success
    /// - `Err(DisassemblerError::MisalignedDataFile)` if the length is not a multiple of 4
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>, vaddr: u32) -> Result<Self> {
        let name = name.into();
        let bytes = bytes.into();

        if bytes.len() % 4 != 0 {
            return Err(DisassemblerError::MisalignedDataFile {
                name,
                length: bytes.len(),
            });
        }

        Ok(Self { name, bytes, vaddr })
    }

    /// Build a data file from big-endian words
    pub fn from_words(name: impl Into<String>, words: &[u32], vaddr: u32) -> Self {
        let bytes = words.iter().flat_map(|w| w.to_be_bytes()).collect::<Vec<u8>>();
        Self {
            name: name.into(),
            bytes,
            vaddr,
        }
    }

    /// Load a raw buffer from disk
    ///
    /// The file stem becomes the data file name.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to a normalized (big-endian) binary
    /// * `vaddr` - Virtual address the buffer is loaded at
    pub fn load<P: AsRef<Path>>(path: P, vaddr: u32) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let mut bytes = Vec::with_capacity(file.metadata()?.len() as usize);
        file.read_to_end(&mut bytes)?;

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("file_{:08X}", vaddr));

        log::debug!("Loaded {} ({} bytes) at 0x{:08X}", name, bytes.len(), vaddr);
        Self::new(name, bytes, vaddr)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn vaddr(&self) -> u32 {
        self.vaddr
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of 32-bit words
    #[inline]
    pub fn len_words(&self) -> usize {
        self.bytes.len() / 4
    }

    /// Exclusive end address, widened so a buffer ending at 0xFFFFFFFF is representable
    #[inline]
    pub fn end_address(&self) -> u64 {
        u64::from(self.vaddr) + self.bytes.len() as u64
    }

    /// Virtual address of the word at `index`
    #[inline]
    pub fn address_of(&self, index: usize) -> u32 {
        self.vaddr.wrapping_add((index as u32).wrapping_mul(4))
    }

    /// Whether `address` falls inside this file's byte range
    #[inline]
    pub fn contains(&self, address: u32) -> bool {
        address >= self.vaddr && u64::from(address) < self.end_address()
    }

    /// Word index of `address`, if it lies in this file
    pub fn index_of(&self, address: u32) -> Option<usize> {
        if self.contains(address) {
            Some(((address - self.vaddr) / 4) as usize)
        } else {
            None
        }
    }

    /// Word at `index`
    pub fn word(&self, index: usize) -> Option<u32> {
        let offset = index.checked_mul(4)?;
        let bytes = self.bytes.get(offset..offset.checked_add(4)?)?;
        Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Word containing `address` (rounded down to 4-byte alignment)
    pub fn word_at(&self, address: u32) -> Option<u32> {
        self.index_of(address).and_then(|index| self.word(index))
    }

    /// Byte at `address`
    pub fn byte_at(&self, address: u32) -> Option<u8> {
        if self.contains(address) {
            self.bytes.get((address - self.vaddr) as usize).copied()
        } else {
            None
        }
    }

    /// Instruction view of the word at `index`
    pub fn instruction(&self, index: usize) -> Option<Instruction> {
        self.word(index)
            .map(|word| Instruction::new(word, self.address_of(index), index))
    }

    /// Iterate every word as an instruction view, in address order
    pub fn instructions(&self) -> impl Iterator<Item = Instruction> + '_ {
        (0..self.len_words()).filter_map(move |index| self.instruction(index))
    }
}
