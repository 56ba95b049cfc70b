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

//! Instruction rendering rules
//!
//! Converts a decoded instruction into assembler text. Rendering is pure: the
//! only outside information it consults is a read-only [`SymbolResolver`]
//! that names branch/jump targets and supplies `%hi`/`%lo` references.

use std::fmt;

use super::catalog::Decoded;
use super::decode::{code_field, jump_target};
use super::opcodes::{OperandLayout, Operation};
use super::registers::{cop0, cop_generic, fpr, gpr, RA};
use super::Instruction;
use crate::core::error::InstructionDiagnostic;

/// Which half of a split address an instruction carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelocationKind {
    Hi,
    Lo,
}

/// Symbolic replacement for an immediate field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    pub kind: RelocationKind,
    pub symbol: String,
    pub offset: u32,
}

impl fmt::Display for Relocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            RelocationKind::Hi => "%hi",
            RelocationKind::Lo => "%lo",
        };
        if self.offset == 0 {
            write!(f, "{}({})", prefix, self.symbol)
        } else {
            write!(f, "{}({} + 0x{:X})", prefix, self.symbol, self.offset)
        }
    }
}

/// Read-only symbol lookups consulted while rendering
pub trait SymbolResolver {
    /// Name of the code symbol at a branch or jump target
    fn target_name(&self, address: u32) -> Option<String>;

    /// Symbolic reference replacing the immediate of the instruction at `address`
    fn relocation(&self, address: u32) -> Option<Relocation>;
}

/// Resolver that knows no symbols; targets fall back to generated names
pub struct NoSymbols;

impl SymbolResolver for NoSymbols {
    fn target_name(&self, _address: u32) -> Option<String> {
        None
    }

    fn relocation(&self, _address: u32) -> Option<Relocation> {
        None
    }
}

/// Rendered instruction text plus any recoverable diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub diagnostic: Option<InstructionDiagnostic>,
}

/// Instruction renderer
///
/// # Example
/// ```
/// use n64dis::core::cpu::{Disassembler, Instruction, NoSymbols};
///
/// let lui = Instruction::new(0x3C088010, 0x80000000, 0);
/// assert_eq!(Disassembler::render(&lui, &NoSymbols).text, "lui $t0, 0x8010");
/// ```
pub struct Disassembler;

impl Disassembler {
    /// Render one instruction
    pub fn render(instr: &Instruction, symbols: &dyn SymbolResolver) -> Rendered {
        match instr.decode() {
            Decoded::Op(op) => Rendered {
                text: Self::render_operation(op, instr, symbols),
                diagnostic: None,
            },
            Decoded::Nop => Rendered {
                text: "nop".to_string(),
                diagnostic: None,
            },
            Decoded::Reserved => Rendered {
                text: format!("/* reserved {:032b} */", instr.word()),
                diagnostic: Some(InstructionDiagnostic::Reserved {
                    word: instr.word(),
                    address: instr.address(),
                }),
            },
            Decoded::Invalid => Rendered {
                text: format!("/* invalid {:032b} */", instr.word()),
                diagnostic: Some(InstructionDiagnostic::Invalid {
                    word: instr.word(),
                    address: instr.address(),
                }),
            },
        }
    }

    /// Render a concrete operation with its operands
    pub fn render_operation(op: Operation, instr: &Instruction, symbols: &dyn SymbolResolver) -> String {
        let name = op.name();
        let rs = gpr(instr.rs());
        let rt = gpr(instr.rt());
        let rd = gpr(instr.rd());

        match op.metadata().layout {
            OperandLayout::None => name.to_string(),
            OperandLayout::RdRsRt => format!("{} {}, {}, {}", name, rd, rs, rt),
            OperandLayout::RdRtRs => format!("{} {}, {}, {}", name, rd, rt, rs),
            OperandLayout::RdRtSa => format!("{} {}, {}, {}", name, rd, rt, instr.shift()),
            OperandLayout::RdRs => {
                if instr.rd() == RA {
                    format!("{} {}", name, rs)
                } else {
                    format!("{} {}, {}", name, rd, rs)
                }
            }
            OperandLayout::RdRsCc => format!("{} {}, {}, $fcc{}", name, rd, rs, instr.rt() >> 2),
            OperandLayout::RsRt => format!("{} {}, {}", name, rs, rt),
            OperandLayout::Rs => format!("{} {}", name, rs),
            OperandLayout::Rd => format!("{} {}", name, rd),
            OperandLayout::Code => {
                let code = if op == Operation::Break {
                    code_field(instr.word()) >> 10
                } else {
                    code_field(instr.word())
                };
                if code == 0 {
                    name.to_string()
                } else {
                    format!("{} {}", name, code)
                }
            }
            OperandLayout::RtRsImm => {
                let imm = match symbols.relocation(instr.address()) {
                    Some(reloc) => reloc.to_string(),
                    None => signed_hex(instr.signed_immediate()),
                };
                format!("{} {}, {}, {}", name, rt, rs, imm)
            }
            OperandLayout::RtRsUimm => format!("{} {}, {}, 0x{:X}", name, rt, rs, instr.immediate()),
            OperandLayout::RtUimm => {
                let imm = match symbols.relocation(instr.address()) {
                    Some(reloc) => reloc.to_string(),
                    None => format!("0x{:X}", instr.immediate()),
                };
                format!("{} {}, {}", name, rt, imm)
            }
            OperandLayout::RsRtOffset => {
                let target = branch_target_name(instr, symbols);
                format!("{} {}, {}, {}", name, rs, rt, target)
            }
            OperandLayout::RsOffset => {
                let target = branch_target_name(instr, symbols);
                format!("{} {}, {}", name, rs, target)
            }
            OperandLayout::RsImm => format!("{} {}, {}", name, rs, signed_hex(instr.signed_immediate())),
            OperandLayout::Offset => format!("{} {}", name, branch_target_name(instr, symbols)),
            OperandLayout::Target => {
                let target = jump_target(instr.address(), instr.jump_field());
                let label = symbols
                    .target_name(target)
                    .unwrap_or_else(|| format!("Func_{:08X}", target));
                format!("{} {}", name, label)
            }
            OperandLayout::RtOffsetBase => {
                format!("{} {}, {}({})", name, rt, memory_offset(instr, symbols), rs)
            }
            OperandLayout::FtOffsetBase => {
                format!("{} {}, {}({})", name, fpr(instr.rt()), memory_offset(instr, symbols), rs)
            }
            OperandLayout::CopOffsetBase => format!(
                "{} {}, {}({})",
                name,
                cop_generic(instr.rt()),
                memory_offset(instr, symbols),
                rs
            ),
            OperandLayout::OpOffsetBase => format!(
                "{} 0x{:X}, {}({})",
                name,
                instr.rt(),
                memory_offset(instr, symbols),
                rs
            ),
            OperandLayout::RtCop0 => format!("{} {}, {}", name, rt, cop0(instr.rd())),
            OperandLayout::RtFs => format!("{} {}, {}", name, rt, fpr(instr.rd())),
            OperandLayout::RtFcr | OperandLayout::RtCop2 => {
                format!("{} {}, {}", name, rt, cop_generic(instr.rd()))
            }
            OperandLayout::FdFsFt => format!(
                "{} {}, {}, {}",
                name,
                fpr(instr.shift()),
                fpr(instr.rd()),
                fpr(instr.rt())
            ),
            OperandLayout::FdFs => format!("{} {}, {}", name, fpr(instr.shift()), fpr(instr.rd())),
            OperandLayout::FsFt => format!("{} {}, {}", name, fpr(instr.rd()), fpr(instr.rt())),
        }
    }
}

/// Signed immediate as hex (`0x18`, `-0x18`)
pub fn signed_hex(value: i32) -> String {
    if value < 0 {
        format!("-0x{:X}", value.unsigned_abs())
    } else {
        format!("0x{:X}", value)
    }
}

fn branch_target_name(instr: &Instruction, symbols: &dyn SymbolResolver) -> String {
    let target = instr.branch_target();
    symbols
        .target_name(target)
        .unwrap_or_else(|| format!("L_{:08X}", target))
}

fn memory_offset(instr: &Instruction, symbols: &dyn SymbolResolver) -> String {
    match symbols.relocation(instr.address()) {
        Some(reloc) if reloc.kind == RelocationKind::Lo => reloc.to_string(),
        _ => signed_hex(instr.signed_immediate()),
    }
}
