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

//! Disassembler core
//!
//! - [`cpu`]: bitfield decoding, operation catalog and instruction rendering
//! - [`memory`]: data files, data regions and address classification
//! - [`analysis`]: symbol table, metadata pass and `lui` pairing
//! - [`render`]: rendering pass and output sinks
//! - [`engine`]: the two-pass pipeline
//! - [`config`]: options and their TOML form
//! - [`error`]: error types

pub mod analysis;
pub mod config;
pub mod cpu;
pub mod engine;
pub mod error;
pub mod memory;
pub mod render;

#[cfg(test)]
mod tests;
