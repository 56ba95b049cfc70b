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

//! Register name tables

/// General purpose register ABI names (o32)
pub const GPR_NAMES: [&str; 32] = [
    "$zero", "$at", "$v0", "$v1", "$a0", "$a1", "$a2", "$a3", "$t0", "$t1", "$t2", "$t3", "$t4",
    "$t5", "$t6", "$t7", "$s0", "$s1", "$s2", "$s3", "$s4", "$s5", "$s6", "$s7", "$t8", "$t9",
    "$k0", "$k1", "$gp", "$sp", "$fp", "$ra",
];

/// Floating point register names
pub const FPR_NAMES: [&str; 32] = [
    "$f0", "$f1", "$f2", "$f3", "$f4", "$f5", "$f6", "$f7", "$f8", "$f9", "$f10", "$f11", "$f12",
    "$f13", "$f14", "$f15", "$f16", "$f17", "$f18", "$f19", "$f20", "$f21", "$f22", "$f23",
    "$f24", "$f25", "$f26", "$f27", "$f28", "$f29", "$f30", "$f31",
];

/// System control coprocessor (COP0) register names on the R4300i
pub const COP0_NAMES: [&str; 32] = [
    "Index",
    "Random",
    "EntryLo0",
    "EntryLo1",
    "Context",
    "PageMask",
    "Wired",
    "Reserved07",
    "BadVAddr",
    "Count",
    "EntryHi",
    "Compare",
    "Status",
    "Cause",
    "EPC",
    "PRevID",
    "Config",
    "LLAddr",
    "WatchLo",
    "WatchHi",
    "XContext",
    "Reserved21",
    "Reserved22",
    "Reserved23",
    "Reserved24",
    "Reserved25",
    "PErr",
    "CacheErr",
    "TagLo",
    "TagHi",
    "ErrorEPC",
    "Reserved31",
];

/// Register holding the return address
pub const RA: u8 = 31;

#[inline]
pub fn gpr(index: u8) -> &'static str {
    GPR_NAMES[usize::from(index & 0x1F)]
}

#[inline]
pub fn fpr(index: u8) -> &'static str {
    FPR_NAMES[usize::from(index & 0x1F)]
}

#[inline]
pub fn cop0(index: u8) -> &'static str {
    COP0_NAMES[usize::from(index & 0x1F)]
}

/// Generic coprocessor register (`$N`), used for COP2 and FPU control registers
pub fn cop_generic(index: u8) -> String {
    format!("${}", index & 0x1F)
}
