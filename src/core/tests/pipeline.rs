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

//! End-to-end pipeline scenarios

use crate::core::config::DisassemblerOptions;
use crate::core::engine::{Disassembler, Disassembly};
use crate::core::memory::DataFile;
use crate::core::render::{DirectorySink, HEADER};

const BASE: u32 = 0x80000000;

fn run(words: &[u32], options: DisassemblerOptions) -> Disassembly {
    let file = DataFile::from_words("code", words, BASE);
    Disassembler::new(options).disassemble(&[file]).unwrap()
}

fn line_for(result: &Disassembly, address: u32) -> String {
    let needle = format!(" {:08X} ", address);
    result.units[0]
        .lines
        .iter()
        .find(|line| line.starts_with("/*") && line.contains(&needle))
        .cloned()
        .unwrap_or_default()
}

#[test]
fn test_pointer_pair_renders_hi_lo() {
    // lui $t0, 0x8010; addiu $t0, $t0, 0x1234; lw $t1, 0($t0); jr $ra
    let words = [0x3C088010, 0x25081234, 0x8D090000, 0x03E00008];
    let options = DisassemblerOptions::new().with_variable(0x80101234, "gTable", 0);
    let result = run(&words, options);

    assert_eq!(
        line_for(&result, 0x80000000),
        "/* 000000 80000000 3C088010 */  lui $t0, %hi(gTable)"
    );
    assert_eq!(
        line_for(&result, 0x80000004),
        "/* 000001 80000004 25081234 */  addiu $t0, $t0, %lo(gTable)"
    );
    assert_eq!(
        line_for(&result, 0x80000008),
        "/* 000002 80000008 8D090000 */  lw $t1, 0x0($t0)"
    );
    assert!(!result.text().contains("0x1234"));
}

#[test]
fn test_pointer_pair_without_symbol_stays_numeric() {
    let words = [0x3C088010, 0x25081234, 0x03E00008, 0];
    let result = run(&words, DisassemblerOptions::new());
    assert!(line_for(&result, 0x80000000).ends_with("lui $t0, 0x8010"));
    assert!(line_for(&result, 0x80000004).ends_with("addiu $t0, $t0, 0x1234"));
}

#[test]
fn test_pointer_pair_with_offset() {
    // lui $a0, 0x8010; lw $a1, 0x1244($a0)
    let words = [0x3C048010, 0x8C851244, 0x03E00008, 0];
    let options = DisassemblerOptions::new().with_variable(0x80101234, "gTable", 0x40);
    let result = run(&words, options);
    assert!(line_for(&result, 0x80000000).ends_with("lui $a0, %hi(gTable + 0x10)"));
    assert!(line_for(&result, 0x80000004).ends_with("lw $a1, %lo(gTable + 0x10)($a0)"));
}

#[test]
fn test_lone_branch_creates_one_label() {
    // beq $zero, $zero, +3 at 0x80000010
    let mut words = vec![0u32; 9];
    words[4] = 0x10000003;
    let result = run(&words, DisassemblerOptions::new());

    let lines = &result.units[0].lines;
    let labels: Vec<_> = lines.iter().filter(|line| line.ends_with(':')).collect();
    assert_eq!(labels, vec!["L_80000020:"]);

    let position = lines.iter().position(|line| line == "L_80000020:").unwrap();
    assert_eq!(lines[position + 1], "/* 000008 80000020 00000000 */  nop");
    assert_eq!(
        line_for(&result, 0x80000010),
        "/* 000004 80000010 10000003 */  beq $zero, $zero, L_80000020"
    );
}

#[test]
fn test_runs_are_idempotent() {
    let words = [
        0x27BDFFE8, // addiu $sp, $sp, -0x18
        0xAFBF0014, // sw $ra, 0x14($sp)
        0x0C000008, // jal 0x80000020
        0x3C048010, // lui $a0, 0x8010 (delay slot)
        0x8C851234, // lw $a1, 0x1234($a0)
        0x14A0FFFD, // bnez $a1, -3
        0x00000000, // nop
        0x8FBF0014, // lw $ra, 0x14($sp)
        0x03E00008, // jr $ra
        0x27BD0018, // addiu $sp, $sp, 0x18
    ];
    let options = DisassemblerOptions::new()
        .with_function(BASE, "main")
        .with_variable(0x80101234, "gCounter", 4);

    let first = run(&words, options.clone());
    let second = run(&words, options);
    assert_eq!(first.text(), second.text());
    assert_eq!(first, second);
    assert!(first.text().contains("jal Func_80000020"));
    assert!(first.text().contains("%lo(gCounter)($a0)"));
}

#[test]
fn test_conflicting_known_functions_abort() {
    let file = DataFile::from_words("code", &[0x03E00008, 0], BASE);
    let options = DisassemblerOptions::new()
        .with_function(BASE, "main")
        .with_function(BASE, "start");
    let err = Disassembler::new(options).disassemble(&[file]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "function conflict at 0x80000000: 'main' already registered, 'start' proposed"
    );
}

#[test]
fn test_known_function_names_calls() {
    // jal 0x80000010; nop; jr $ra; nop; (0x80000010) jr $ra; nop
    let words = [0x0C000004, 0, 0x03E00008, 0, 0x03E00008, 0];
    let options = DisassemblerOptions::new().with_function(0x80000010, "osInit");
    let result = run(&words, options);
    assert!(line_for(&result, BASE).ends_with("jal osInit"));
    assert!(result.units[0].lines.iter().any(|line| line == "glabel osInit"));
}

#[test]
fn test_jump_table_in_data_region() {
    let words = [
        0x03E00008, // jr $ra
        0x00000000, // nop
        0x03E00008, // case 1
        0x00000000,
        0x80000008, // table[0]
        0x80000000, // table[1]
        0x00000007, // not code: ends the table
        0x00000000,
    ];
    let options = DisassemblerOptions::new()
        .with_data_region(0x80000010, 0x8000001F)
        .with_variable(0x80000010, "__switch_80000010", 8);
    let result = run(&words, options);
    let lines = &result.units[0].lines;

    assert!(lines.contains(&"glabel L_80000008".to_string()));
    assert!(lines.contains(&"glabel L_80000000".to_string()));
    assert!(lines.contains(&"glabel __switch_80000010".to_string()));
    assert!(line_for(&result, 0x80000010).ends_with(".word L_80000008"));
    assert!(line_for(&result, 0x80000018).ends_with(".word 0x00000007"));
}

#[test]
fn test_reserved_encoding_is_recoverable() {
    let words = [0x70000000, 0x03E00008, 0];
    let result = run(&words, DisassemblerOptions::new());
    assert_eq!(result.operations.len(), 3);
    assert!(result.operations[0].diagnostic.is_some());
    assert!(result.operations[1].diagnostic.is_none());
    assert!(line_for(&result, BASE).contains("/* reserved 0111"));
}

#[test]
fn test_calls_across_files() {
    let caller = DataFile::from_words("caller", &[0x0C040000, 0], 0x80000000);
    let callee = DataFile::from_words("callee", &[0x03E00008, 0], 0x80100000);
    let result = Disassembler::new(DisassemblerOptions::new())
        .disassemble(&[caller, callee])
        .unwrap();

    assert_eq!(result.units.len(), 2);
    assert_eq!(result.units[1].name, "callee");
    assert!(result.units[1].lines.contains(&"glabel Func_80100000".to_string()));
    assert_eq!(result.operations[0].file, "caller");
    assert_eq!(result.operations[2].file, "callee");
}

#[test]
fn test_split_output_units() {
    let words = [0x03E00008, 0, 0x03E00008, 0];
    let options = DisassemblerOptions::new()
        .with_object(0x80000000, Some("first"), None)
        .with_object(0x80000008, Some("second"), None)
        .with_split_output(true);
    let result = run(&words, options);

    let names: Vec<_> = result.units.iter().map(|unit| unit.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);
    for unit in &result.units {
        assert_eq!(&unit.lines[..HEADER.len()], &HEADER);
    }
    // Objects in code also start functions
    assert!(result.units[1].lines.contains(&"glabel Func_80000008".to_string()));
}

#[test]
fn test_directory_output() {
    let dir = tempfile::tempdir().unwrap();
    let file = DataFile::from_words("boot", &[0x03E00008, 0], BASE);
    let mut sink = DirectorySink::new(dir.path()).unwrap();

    let operations = Disassembler::new(DisassemblerOptions::new())
        .disassemble_into(&[file], &mut sink)
        .unwrap();
    assert_eq!(operations.len(), 2);

    let text = std::fs::read_to_string(dir.path().join("boot.s")).unwrap();
    assert!(text.starts_with(".include \"macro.inc\"\n\n.set noat\n"));
    assert!(text.contains("/* 000000 80000000 03E00008 */  jr $ra\n"));
}
