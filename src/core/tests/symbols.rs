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

//! Symbol table scenarios

use crate::core::analysis::{RomVariable, Symbol, SymbolTable};
use crate::core::config::DisassemblerOptions;
use crate::core::error::{DisassemblerError, SymbolKind};
use crate::core::memory::{AddressClassifier, DataFile};
use proptest::prelude::*;

fn table_with(addresses: &[u32]) -> SymbolTable {
    let table = SymbolTable::new();
    for &address in addresses {
        table
            .register_variable(RomVariable {
                address,
                size: 0,
                name: None,
            })
            .unwrap();
    }
    table
}

#[test]
fn test_seeding_known_object_and_variable() {
    let file = DataFile::from_words("code", &[0; 16], 0x80000000);
    let classifier = AddressClassifier::new(std::slice::from_ref(&file), &[]);
    let options = DisassemblerOptions::new()
        .with_variable(0x80100000, "gBuffer", 0x100)
        .with_object(0x80000020, Some("part2"), Some(0x20));

    let table = SymbolTable::seeded(&options, &classifier).unwrap();
    assert_eq!(table.variable(0x80100000).unwrap().display_name(), "gBuffer");
    assert_eq!(table.object(0x80000020).unwrap().size, Some(0x20));
    assert!(table.function(0x80000020).is_some());
}

#[test]
fn test_object_name_conflict() {
    let classifier = AddressClassifier::new(&[], &[]);
    let options = DisassemblerOptions::new()
        .with_object(0x80000020, Some("a"), None)
        .with_object(0x80000020, Some("b"), None);
    match SymbolTable::seeded(&options, &classifier) {
        Err(DisassemblerError::SymbolConflict { kind, .. }) => assert_eq!(kind, SymbolKind::Object),
        other => panic!("expected object conflict, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_unnamed_object_is_compatible_with_named() {
    let classifier = AddressClassifier::new(&[], &[]);
    let options = DisassemblerOptions::new()
        .with_object(0x80000020, Some("a"), None)
        .with_object(0x80000020, None, None);
    let table = SymbolTable::seeded(&options, &classifier).unwrap();
    assert_eq!(table.object(0x80000020).unwrap().display_name(), "a");
}

#[test]
fn test_generated_variable_names_in_offsets() {
    let table = table_with(&[0x80100000, 0x80100010]);
    assert_eq!(table.variable_offset(0x80100004), Some((0x80100000, 4)));
    assert_eq!(table.name_at(0x80100010).as_deref(), Some("D_80100010"));
}

proptest! {
    #[test]
    fn test_offset_attribution_is_floor(
        addresses in prop::collection::btree_set(0x80000000u32..0x80010000, 1..16),
        probe in 0x80000000u32..0x80010000,
    ) {
        let list: Vec<u32> = addresses.into_iter().collect();
        let table = table_with(&list);

        match table.variable_offset(probe) {
            Some((base, offset)) => {
                prop_assert!(list.contains(&base));
                prop_assert_eq!(base + offset, probe);
                // No variable lies strictly between base and probe
                prop_assert!(!list.iter().any(|&a| a > base && a <= probe));
            }
            None => {
                let floor = list.iter().copied().filter(|&a| a <= probe).max();
                if let Some(floor) = floor {
                    prop_assert!(floor != probe);
                    let next = list.iter().copied().find(|&a| a > probe);
                    if let Some(next) = next {
                        prop_assert!(probe - floor > next - probe);
                    }
                }
            }
        }
    }

    #[test]
    fn test_exact_match_has_zero_offset(
        addresses in prop::collection::btree_set(0x80000000u32..0x80010000, 1..16),
    ) {
        let list: Vec<u32> = addresses.into_iter().collect();
        let table = table_with(&list);
        for &address in &list {
            prop_assert_eq!(table.variable_offset(address), Some((address, 0)));
        }
    }
}
