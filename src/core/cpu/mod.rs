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

//! MIPS R4300i instruction model
//!
//! Bitfield decoding, the static operation catalog and the text renderer.
//! Nothing in this module depends on analysis state; symbol information
//! enters rendering only through [`SymbolResolver`].

// Module declarations
mod catalog;
pub mod decode;
mod disassembler;
pub mod opcodes;
pub mod registers;
#[cfg(test)]
mod tests;

// Re-exports
pub use catalog::{Decoded, OperationCatalog};
pub use disassembler::{
    signed_hex, Disassembler, NoSymbols, Relocation, RelocationKind, Rendered, SymbolResolver,
};
pub use opcodes::{MipsVersion, OperandLayout, Operation, OperationMetadata, Restrictions};

/// One 32-bit instruction word positioned in its file
///
/// `index` is the word index within the owning data file and `address` the
/// virtual address the word is loaded at. The view is immutable and cheap to
/// copy.
///
/// # Example
/// ```
/// use n64dis::core::cpu::{Instruction, Operation};
///
/// // beq $zero, $zero, +3
/// let instr = Instruction::new(0x10000003, 0x80000010, 4);
/// assert_eq!(instr.operation(), Some(Operation::Beq));
/// assert_eq!(instr.branch_target(), 0x80000020);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    word: u32,
    address: u32,
    index: usize,
}

impl Instruction {
    /// Create an instruction view
    ///
    /// # Arguments
    ///
    /// * `word` - Raw big-endian-decoded instruction word
    /// * `address` - Virtual address of the word
    /// * `index` - Word index within the owning file
    pub fn new(word: u32, address: u32, index: usize) -> Self {
        Self {
            word,
            address,
            index,
        }
    }

    #[inline]
    pub fn word(&self) -> u32 {
        self.word
    }

    #[inline]
    pub fn address(&self) -> u32 {
        self.address
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn opcode(&self) -> u8 {
        decode::opcode(self.word)
    }

    #[inline]
    pub fn rs(&self) -> u8 {
        decode::rs(self.word)
    }

    #[inline]
    pub fn rt(&self) -> u8 {
        decode::rt(self.word)
    }

    #[inline]
    pub fn rd(&self) -> u8 {
        decode::rd(self.word)
    }

    #[inline]
    pub fn shift(&self) -> u8 {
        decode::shift(self.word)
    }

    #[inline]
    pub fn funct(&self) -> u8 {
        decode::funct(self.word)
    }

    #[inline]
    pub fn immediate(&self) -> u16 {
        decode::immediate(self.word)
    }

    /// Sign-extended immediate
    #[inline]
    pub fn signed_immediate(&self) -> i32 {
        decode::sign_extend(self.immediate())
    }

    #[inline]
    pub fn jump_field(&self) -> u32 {
        decode::jump_field(self.word)
    }

    /// PC-relative branch destination
    #[inline]
    pub fn branch_target(&self) -> u32 {
        decode::branch_target(self.address, self.signed_immediate())
    }

    /// Destination of this instruction when treated as a branch or jump
    ///
    /// `j`/`jal` use the 26-bit absolute field, everything else the signed
    /// 16-bit offset.
    pub fn absolute_jump_address(&self) -> u32 {
        match self.opcode() {
            0x02 | 0x03 => decode::jump_target(self.address, self.jump_field()),
            _ => self.branch_target(),
        }
    }

    /// Catalog entry for this word
    #[inline]
    pub fn decode(&self) -> Decoded {
        OperationCatalog::decode(self.word)
    }

    /// Concrete operation, or `None` for nop/reserved/invalid words
    #[inline]
    pub fn operation(&self) -> Option<Operation> {
        self.decode().operation()
    }

    /// General purpose register this instruction overwrites, if any
    pub fn gpr_destination(&self) -> Option<u8> {
        self.operation().and_then(|op| op.gpr_destination(self.word))
    }
}
