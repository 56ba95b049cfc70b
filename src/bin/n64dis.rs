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

//! n64dis command line entry point
//!
//! Disassembles normalized big-endian binaries into assembler source, one
//! `.s` file per output unit when `--out` is given, stdout otherwise.

use clap::Parser;
use n64dis::core::cpu::Operation;
use n64dis::core::render::DirectorySink;
use n64dis::{DataFile, Disassembler, DisassemblerOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "n64dis")]
#[command(author, version, about = "MIPS R4300i (N64) disassembler", long_about = None)]
struct Cli {
    /// Raw, big-endian input binaries
    #[arg(value_name = "INPUT", required_unless_present = "list_operations")]
    inputs: Vec<PathBuf>,

    /// Virtual address of each input (hex); a single address places later inputs back to back
    #[arg(long, value_name = "HEX", value_parser = parse_hex, required_unless_present = "list_operations")]
    vaddr: Vec<u32>,

    /// Options file (TOML) with known symbols and data regions
    #[arg(short, long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Output directory, one `.s` file per unit
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Start a new output unit at every object
    #[arg(long)]
    split: bool,

    /// Print the operation catalog as JSON and exit
    #[arg(long)]
    list_operations: bool,
}

fn parse_hex(value: &str) -> Result<u32, String> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid hex address '{}': {}", value, e))
}

/// Load inputs at their virtual addresses
fn load_inputs(inputs: &[PathBuf], vaddrs: &[u32]) -> Result<Vec<DataFile>, Box<dyn std::error::Error>> {
    if vaddrs.len() != 1 && vaddrs.len() != inputs.len() {
        return Err(format!(
            "expected 1 or {} --vaddr values, got {}",
            inputs.len(),
            vaddrs.len()
        )
        .into());
    }

    let mut files: Vec<DataFile> = Vec::with_capacity(inputs.len());
    for (i, path) in inputs.iter().enumerate() {
        let vaddr = match (vaddrs.get(i), files.last()) {
            (Some(&vaddr), _) if vaddrs.len() == inputs.len() => vaddr,
            (_, Some(prev)) => prev.vaddr().wrapping_add(prev.len() as u32),
            _ => vaddrs[0],
        };
        let file = DataFile::load(path, vaddr)?;
        log::info!("{}: {} bytes at 0x{:08X}", path.display(), file.len(), vaddr);
        files.push(file);
    }
    Ok(files)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Pick up RUST_LOG from a local .env when present
    dotenvy::dotenv().ok();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if cli.list_operations {
        let catalog: Vec<_> = Operation::all().iter().map(|op| op.metadata()).collect();
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    let mut options = match &cli.config {
        Some(path) => DisassemblerOptions::load(path)?,
        None => DisassemblerOptions::default(),
    };
    if cli.split {
        options.split_output = true;
    }

    let files = load_inputs(&cli.inputs, &cli.vaddr)?;
    let disassembler = Disassembler::new(options);

    match &cli.out {
        Some(dir) => {
            let mut sink = DirectorySink::new(dir)?;
            disassembler.disassemble_into(&files, &mut sink)?;
            log::info!("Wrote {} files to {}", sink.written().len(), dir.display());
        }
        None => {
            let result = disassembler.disassemble(&files)?;
            print!("{}", result.text());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("0x80000400"), Ok(0x80000400));
        assert_eq!(parse_hex("80000400"), Ok(0x80000400));
        assert!(parse_hex("0xZZ").is_err());
    }

    #[test]
    fn test_cli_requires_vaddr() {
        assert!(Cli::try_parse_from(["n64dis", "rom.bin"]).is_err());
        assert!(Cli::try_parse_from(["n64dis", "rom.bin", "--vaddr", "0x80000400"]).is_ok());
        assert!(Cli::try_parse_from(["n64dis", "--list-operations"]).is_ok());
    }

    #[test]
    fn test_inputs_placed_back_to_back() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        std::fs::write(&a, [0u8; 8]).unwrap();
        std::fs::write(&b, [0u8; 4]).unwrap();

        let files = load_inputs(&[a.clone(), b.clone()], &[0x80000400]).unwrap();
        assert_eq!(files[0].vaddr(), 0x80000400);
        assert_eq!(files[1].vaddr(), 0x80000408);

        let files = load_inputs(&[a.clone(), b.clone()], &[0x80000400, 0x80100000]).unwrap();
        assert_eq!(files[1].vaddr(), 0x80100000);

        assert!(load_inputs(&[a, b], &[1, 2, 3]).is_err());
    }
}
