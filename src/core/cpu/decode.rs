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

//! Instruction bitfield extraction
//!
//! Every accessor is a pure mask-and-shift over a 32-bit word and cannot fail.
//!
//! ```text
//! R-type: | op (6) | rs (5) | rt (5) | rd (5) | shamt (5) | funct (6) |
//! I-type: | op (6) | rs (5) | rt (5) |        immediate (16)          |
//! J-type: | op (6) |                 target (26)                      |
//! ```

/// Primary opcode (bits 31..26)
#[inline(always)]
pub fn opcode(word: u32) -> u8 {
    ((word >> 26) & 0x3F) as u8
}

/// Source register (bits 25..21)
#[inline(always)]
pub fn rs(word: u32) -> u8 {
    ((word >> 21) & 0x1F) as u8
}

/// Target register (bits 20..16)
#[inline(always)]
pub fn rt(word: u32) -> u8 {
    ((word >> 16) & 0x1F) as u8
}

/// Destination register (bits 15..11)
#[inline(always)]
pub fn rd(word: u32) -> u8 {
    ((word >> 11) & 0x1F) as u8
}

/// Shift amount (bits 10..6)
#[inline(always)]
pub fn shift(word: u32) -> u8 {
    ((word >> 6) & 0x1F) as u8
}

/// Function code (bits 5..0)
#[inline(always)]
pub fn funct(word: u32) -> u8 {
    (word & 0x3F) as u8
}

/// Unsigned 16-bit immediate
#[inline(always)]
pub fn immediate(word: u32) -> u16 {
    (word & 0xFFFF) as u16
}

/// 26-bit jump target field
#[inline(always)]
pub fn jump_field(word: u32) -> u32 {
    word & 0x03FF_FFFF
}

/// Trap/break code field (bits 25..6)
#[inline(always)]
pub fn code_field(word: u32) -> u32 {
    (word >> 6) & 0x000F_FFFF
}

/// Sign-extend a 16-bit immediate
///
/// Values with bit 15 clear are returned unchanged; otherwise the value is
/// widened by adding it to `-65536`, so `0x8000` maps to `-32768` and
/// `0xFFFF` maps to `-1`.
#[inline(always)]
pub fn sign_extend(imm: u16) -> i32 {
    if imm & 0x8000 == 0 {
        i32::from(imm)
    } else {
        -0x1_0000 + i32::from(imm)
    }
}

/// Target of a PC-relative branch at `address`: `(offset + 1) * 4 + address`
#[inline(always)]
pub fn branch_target(address: u32, offset: i32) -> u32 {
    (offset.wrapping_add(1).wrapping_mul(4) as u32).wrapping_add(address)
}

/// Target of an absolute jump at `address`: `(field * 4) | (address & 0xF0000000)`
#[inline(always)]
pub fn jump_target(address: u32, field: u32) -> u32 {
    (field << 2) | (address & 0xF000_0000)
}
