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

//! Instruction view tests

use crate::core::cpu::{Instruction, Operation};

#[test]
fn test_instruction_fields() {
    // lw $t1, 0x123C($t0)
    let instr = Instruction::new(0x8D09123C, 0x80000008, 2);
    assert_eq!(instr.word(), 0x8D09123C);
    assert_eq!(instr.address(), 0x80000008);
    assert_eq!(instr.index(), 2);
    assert_eq!(instr.opcode(), 0x23);
    assert_eq!(instr.rs(), 8);
    assert_eq!(instr.rt(), 9);
    assert_eq!(instr.immediate(), 0x123C);
    assert_eq!(instr.operation(), Some(Operation::Lw));
    assert_eq!(instr.gpr_destination(), Some(9));
}

#[test]
fn test_signed_immediate() {
    let instr = Instruction::new(0x27BDFFE8, 0x80000000, 0);
    assert_eq!(instr.signed_immediate(), -0x18);
}

#[test]
fn test_absolute_jump_address_for_jumps() {
    // jal 0x80400000 from 0x80001000
    let instr = Instruction::new(0x0C100000, 0x80001000, 0);
    assert_eq!(instr.absolute_jump_address(), 0x80400000);
}

#[test]
fn test_absolute_jump_address_for_branches() {
    // bne $a0, $zero, -2
    let instr = Instruction::new(0x1480FFFE, 0x80000100, 0x40);
    assert_eq!(instr.absolute_jump_address(), 0x800000FC);
}

#[test]
fn test_link_destination() {
    let jal = Instruction::new(0x0C100000, 0x80001000, 0);
    assert_eq!(jal.gpr_destination(), Some(31));
    let sw = Instruction::new(0xAFBF0014, 0x80001000, 0);
    assert_eq!(sw.gpr_destination(), None);
}

#[test]
fn test_nop_has_no_operation() {
    let instr = Instruction::new(0, 0x80000000, 0);
    assert_eq!(instr.operation(), None);
    assert_eq!(instr.gpr_destination(), None);
}
