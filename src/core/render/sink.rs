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

//! Output sinks
//!
//! The rendering pass produces named units of text lines. Sinks decide where
//! those lines go.

use crate::core::error::Result;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Destination for rendered output units
pub trait OutputSink {
    /// Start a new unit; subsequent lines belong to it
    fn begin_unit(&mut self, name: &str) -> Result<()>;

    /// Append one line to the current unit
    fn emit_line(&mut self, line: &str) -> Result<()>;

    /// Flush everything; no more lines follow
    fn finish(&mut self) -> Result<()>;
}

/// One rendered output unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputUnit {
    pub name: String,
    pub lines: Vec<String>,
}

impl OutputUnit {
    /// Lines joined with newlines, with a trailing newline
    pub fn text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }
}

/// Sink that keeps every unit in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    units: Vec<OutputUnit>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn units(&self) -> &[OutputUnit] {
        &self.units
    }

    pub fn into_units(self) -> Vec<OutputUnit> {
        self.units
    }
}

impl OutputSink for MemorySink {
    fn begin_unit(&mut self, name: &str) -> Result<()> {
        self.units.push(OutputUnit {
            name: name.to_string(),
            lines: Vec::new(),
        });
        Ok(())
    }

    fn emit_line(&mut self, line: &str) -> Result<()> {
        if self.units.is_empty() {
            self.begin_unit("output")?;
        }
        if let Some(unit) = self.units.last_mut() {
            unit.lines.push(line.to_string());
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Sink writing each unit to `<dir>/<name>.s`
///
/// # Example
/// ```no_run
/// use n64dis::core::render::{DirectorySink, OutputSink};
///
/// let mut sink = DirectorySink::new("asm").unwrap();
/// sink.begin_unit("boot").unwrap();
/// sink.emit_line(".set noat").unwrap();
/// sink.finish().unwrap();
/// ```
pub struct DirectorySink {
    /// Output directory
    dir: PathBuf,
    /// Writer for the unit currently being emitted
    output: Option<BufWriter<File>>,
    /// Paths written so far
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Create a sink, creating the directory if needed
    ///
    /// # Arguments
    ///
    /// * `dir` - Directory receiving one `.s` file per unit
    ///
    /// # Returns
    ///
    /// - `Ok(DirectorySink)` if the directory exists or was created
    /// - `Err(DisassemblerError::Io)` otherwise
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            output: None,
            written: Vec::new(),
        })
    }

    /// Files created by this sink, in creation order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn close_current(&mut self) -> Result<()> {
        if let Some(mut output) = self.output.take() {
            if let Err(e) = output.flush() {
                log::warn!("Failed to flush output unit: {}", e);
                return Err(e.into());
            }
        }
        Ok(())
    }
}

impl OutputSink for DirectorySink {
    fn begin_unit(&mut self, name: &str) -> Result<()> {
        self.close_current()?;

        let path = self.dir.join(format!("{}.s", name));
        let file = File::create(&path)?;
        log::debug!("Writing {}", path.display());
        self.output = Some(BufWriter::new(file));
        self.written.push(path);
        Ok(())
    }

    fn emit_line(&mut self, line: &str) -> Result<()> {
        if self.output.is_none() {
            self.begin_unit("output")?;
        }
        if let Some(output) = self.output.as_mut() {
            if let Err(e) = writeln!(output, "{}", line) {
                log::warn!("Failed to write output line: {}", e);
                return Err(e.into());
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.close_current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_collects_units() {
        let mut sink = MemorySink::new();
        sink.begin_unit("a").unwrap();
        sink.emit_line("nop").unwrap();
        sink.begin_unit("b").unwrap();
        sink.emit_line("jr $ra").unwrap();
        sink.emit_line("nop").unwrap();
        sink.finish().unwrap();

        let units = sink.into_units();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].lines, vec!["nop"]);
        assert_eq!(units[1].name, "b");
        assert_eq!(units[1].text(), "jr $ra\nnop\n");
    }

    #[test]
    fn test_memory_sink_implicit_unit() {
        let mut sink = MemorySink::new();
        sink.emit_line("nop").unwrap();
        assert_eq!(sink.units()[0].name, "output");
    }

    #[test]
    fn test_directory_sink_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("asm")).unwrap();
        sink.begin_unit("boot").unwrap();
        sink.emit_line(".set noat").unwrap();
        sink.begin_unit("main").unwrap();
        sink.emit_line("jr $ra").unwrap();
        sink.finish().unwrap();

        assert_eq!(sink.written().len(), 2);
        let boot = fs::read_to_string(dir.path().join("asm/boot.s")).unwrap();
        assert_eq!(boot, ".set noat\n");
        let main = fs::read_to_string(dir.path().join("asm/main.s")).unwrap();
        assert_eq!(main, "jr $ra\n");
    }

    #[test]
    fn test_directory_sink_bad_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        assert!(DirectorySink::new(blocker.join("sub")).is_err());
    }
}
