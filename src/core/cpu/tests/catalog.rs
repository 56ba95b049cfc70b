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

//! Catalog coverage tests

use crate::core::cpu::{Decoded, Disassembler, Instruction, NoSymbols, Operation, OperationCatalog};
use proptest::prelude::*;

/// Build an R-type word from its fields
fn r_type(op: u32, rs: u32, rt: u32, rd: u32, sa: u32, funct: u32) -> u32 {
    (op << 26) | (rs << 21) | (rt << 16) | (rd << 11) | (sa << 6) | funct
}

#[test]
fn test_every_operation_has_a_name() {
    for op in Operation::all() {
        assert!(!op.name().is_empty(), "{:?} has an empty name", op);
        assert!(!op.metadata().description.is_empty());
    }
}

#[test]
fn test_operation_names_are_unique() {
    let mut names: Vec<&str> = Operation::all().iter().map(|op| op.name()).collect();
    names.sort_unstable();
    let before = names.len();
    names.dedup();
    assert_eq!(before, names.len());
}

#[test]
fn test_reserved_primary_opcodes() {
    for op in [0x13u32, 0x1C, 0x1D, 0x1E, 0x1F, 0x3B] {
        assert_eq!(OperationCatalog::decode(op << 26), Decoded::Reserved, "opcode {:#x}", op);
    }
}

#[test]
fn test_reserved_special_functions() {
    for funct in [0x05u32, 0x0E, 0x15, 0x28, 0x29, 0x35, 0x37, 0x39, 0x3D] {
        let word = r_type(0, 1, 2, 3, 0, funct);
        assert_eq!(OperationCatalog::decode(word), Decoded::Reserved, "funct {:#x}", funct);
    }
}

#[test]
fn test_nop_forms() {
    // sll $zero, $zero, 0
    assert_eq!(OperationCatalog::decode(0), Decoded::Nop);
    // addu $zero, $t0, $t1
    assert_eq!(OperationCatalog::decode(r_type(0, 8, 9, 0, 0, 0x21)), Decoded::Nop);
    // ori $zero, $t0, 0x10
    assert_eq!(OperationCatalog::decode(0x35000010), Decoded::Nop);
    // jalr and stores never collapse
    assert_eq!(
        OperationCatalog::decode(r_type(0, 8, 0, 0, 0, 0x09)),
        Decoded::Op(Operation::Jalr)
    );
    assert_eq!(OperationCatalog::decode(0xAC000000), Decoded::Op(Operation::Sw));
}

#[test]
fn test_fpu_word_format_only_converts() {
    // cvt.s.w $f0, $f2
    assert_eq!(
        OperationCatalog::decode(r_type(0x11, 0x14, 0, 2, 0, 0x20)),
        Decoded::Op(Operation::CvtSW)
    );
    // add.w is not an operation
    assert_eq!(OperationCatalog::decode(r_type(0x11, 0x14, 4, 2, 0, 0x00)), Decoded::Invalid);
}

#[test]
fn test_fpu_branch_condition_out_of_range() {
    assert_eq!(OperationCatalog::decode(r_type(0x11, 0x08, 0x04, 0, 0, 0)), Decoded::Invalid);
}

#[test]
fn test_every_catalog_entry_decodes_from_some_word() {
    let mut seen = std::collections::HashSet::new();
    for op in 0u32..64 {
        let selectors = if matches!(op, 0x00 | 0x01 | 0x10 | 0x11 | 0x12) { 32 } else { 1 };
        for rs in 0..selectors {
            for rt in 0..selectors {
                for funct in 0u32..64 {
                    // primary opcodes take rt = $at so immediates never collapse to nop
                    let rt = if selectors == 1 { 1 } else { rt };
                    let word = r_type(op, rs, rt, 1, 1, funct);
                    if let Decoded::Op(operation) = OperationCatalog::decode(word) {
                        seen.insert(operation);
                    }
                }
            }
        }
    }
    for op in Operation::all() {
        assert!(seen.contains(op), "{:?} is unreachable", op);
    }
}

proptest! {
    #[test]
    fn test_decode_is_total(word in any::<u32>()) {
        let decoded = OperationCatalog::decode(word);
        if let Decoded::Op(op) = decoded {
            prop_assert!(Operation::all().contains(&op));
        }
    }

    #[test]
    fn test_render_never_empty(word in any::<u32>(), address in any::<u32>()) {
        let rendered = Disassembler::render(&Instruction::new(word, address & !3, 0), &NoSymbols);
        prop_assert!(!rendered.text.is_empty());
        let flagged = matches!(
            OperationCatalog::decode(word),
            Decoded::Reserved | Decoded::Invalid
        );
        prop_assert_eq!(rendered.diagnostic.is_some(), flagged);
    }
}
