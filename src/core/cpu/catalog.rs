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

//! Opcode dispatch
//!
//! Maps a 32-bit word to exactly one of: a concrete [`Operation`], a no-op,
//! a reserved encoding or an invalid encoding.
//!
//! Dispatch order:
//! - opcode 0 (SPECIAL): keyed by `funct`
//! - opcode 1 (REGIMM): keyed by `rt`
//! - opcodes 16/17/18 (COP0/COP1/COP2): keyed by `rs`, then `funct` (or `rt`
//!   for coprocessor branches)
//! - everything else: keyed by the opcode alone

use super::decode::{funct, opcode, rs, rt};
use super::opcodes::{Operation, COMPARE_DOUBLE, COMPARE_SINGLE};

/// Result of decoding one instruction word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decoded {
    /// A concrete operation
    Op(Operation),
    /// A register-writing operation whose destination is `$zero`
    Nop,
    /// Encoding slot the architecture reserves
    Reserved,
    /// Encoding with no defined meaning
    Invalid,
}

impl Decoded {
    /// The concrete operation, if any
    pub fn operation(self) -> Option<Operation> {
        match self {
            Decoded::Op(op) => Some(op),
            _ => None,
        }
    }
}

/// Static operation catalog
///
/// # Example
/// ```
/// use n64dis::core::cpu::{Decoded, Operation, OperationCatalog};
///
/// assert_eq!(OperationCatalog::decode(0x3C088010), Decoded::Op(Operation::Lui));
/// assert_eq!(OperationCatalog::decode(0x00000000), Decoded::Nop);
/// assert_eq!(OperationCatalog::decode(0x70000000), Decoded::Reserved);
/// ```
pub struct OperationCatalog;

impl OperationCatalog {
    /// Decode a word into its catalog entry
    ///
    /// Total over every 32-bit input.
    pub fn decode(word: u32) -> Decoded {
        let decoded = match opcode(word) {
            0x00 => Self::special(word),
            0x01 => Self::regimm(word),
            0x10 => Self::cop0(word),
            0x11 => Self::cop1(word),
            0x12 => Self::cop2(word),
            op => Self::primary(op),
        };

        match decoded {
            Decoded::Op(op)
                if op.metadata().layout.writes_gpr_destination()
                    && op.gpr_destination(word) == Some(0) =>
            {
                Decoded::Nop
            }
            other => other,
        }
    }

    fn primary(op: u8) -> Decoded {
        use Operation::*;

        let operation = match op {
            0x02 => Jump,
            0x03 => Jal,
            0x04 => Beq,
            0x05 => Bne,
            0x06 => Blez,
            0x07 => Bgtz,
            0x08 => Addi,
            0x09 => Addiu,
            0x0A => Slti,
            0x0B => Sltiu,
            0x0C => Andi,
            0x0D => Ori,
            0x0E => Xori,
            0x0F => Lui,
            0x14 => Beql,
            0x15 => Bnel,
            0x16 => Blezl,
            0x17 => Bgtzl,
            0x18 => Daddi,
            0x19 => Daddiu,
            0x1A => Ldl,
            0x1B => Ldr,
            0x20 => Lb,
            0x21 => Lh,
            0x22 => Lwl,
            0x23 => Lw,
            0x24 => Lbu,
            0x25 => Lhu,
            0x26 => Lwr,
            0x27 => Lwu,
            0x28 => Sb,
            0x29 => Sh,
            0x2A => Swl,
            0x2B => Sw,
            0x2C => Sdl,
            0x2D => Sdr,
            0x2E => Swr,
            0x2F => Cache,
            0x30 => Ll,
            0x31 => Lwc1,
            0x32 => Lwc2,
            0x33 => Pref,
            0x34 => Lld,
            0x35 => Ldc1,
            0x36 => Ldc2,
            0x37 => Ld,
            0x38 => Sc,
            0x39 => Swc1,
            0x3A => Swc2,
            0x3C => Scd,
            0x3D => Sdc1,
            0x3E => Sdc2,
            0x3F => Sd,
            // 0x13 (COP1X), 0x1C-0x1F, 0x3B
            _ => return Decoded::Reserved,
        };
        Decoded::Op(operation)
    }

    fn special(word: u32) -> Decoded {
        use Operation::*;

        let operation = match funct(word) {
            0x00 => Sll,
            0x01 => {
                if rt(word) & 0x01 == 0 {
                    Movf
                } else {
                    Movt
                }
            }
            0x02 => Srl,
            0x03 => Sra,
            0x04 => Sllv,
            0x06 => Srlv,
            0x07 => Srav,
            0x08 => Jr,
            0x09 => Jalr,
            0x0A => Movz,
            0x0B => Movn,
            0x0C => Syscall,
            0x0D => Break,
            0x0F => Sync,
            0x10 => Mfhi,
            0x11 => Mthi,
            0x12 => Mflo,
            0x13 => Mtlo,
            0x14 => Dsllv,
            0x16 => Dsrlv,
            0x17 => Dsrav,
            0x18 => Mult,
            0x19 => Multu,
            0x1A => Div,
            0x1B => Divu,
            0x1C => Dmult,
            0x1D => Dmultu,
            0x1E => Ddiv,
            0x1F => Ddivu,
            0x20 => Add,
            0x21 => Addu,
            0x22 => Sub,
            0x23 => Subu,
            0x24 => And,
            0x25 => Or,
            0x26 => Xor,
            0x27 => Nor,
            0x2A => Slt,
            0x2B => Sltu,
            0x2C => Dadd,
            0x2D => Daddu,
            0x2E => Dsub,
            0x2F => Dsubu,
            0x30 => Tge,
            0x31 => Tgeu,
            0x32 => Tlt,
            0x33 => Tltu,
            0x34 => Teq,
            0x36 => Tne,
            0x38 => Dsll,
            0x3A => Dsrl,
            0x3B => Dsra,
            0x3C => Dsll32,
            0x3E => Dsrl32,
            0x3F => Dsra32,
            // 0x05, 0x0E, 0x15, 0x28, 0x29, 0x35, 0x37, 0x39, 0x3D
            _ => return Decoded::Reserved,
        };
        Decoded::Op(operation)
    }

    fn regimm(word: u32) -> Decoded {
        use Operation::*;

        let operation = match rt(word) {
            0x00 => Bltz,
            0x01 => Bgez,
            0x02 => Bltzl,
            0x03 => Bgezl,
            0x08 => Tgei,
            0x09 => Tgeiu,
            0x0A => Tlti,
            0x0B => Tltiu,
            0x0C => Teqi,
            0x0E => Tnei,
            0x10 => Bltzal,
            0x11 => Bgezal,
            0x12 => Bltzall,
            0x13 => Bgezall,
            _ => return Decoded::Reserved,
        };
        Decoded::Op(operation)
    }

    fn cop0(word: u32) -> Decoded {
        use Operation::*;

        let operation = match rs(word) {
            0x00 => Mfc0,
            0x01 => Dmfc0,
            0x04 => Mtc0,
            0x05 => Dmtc0,
            0x10..=0x1F => match funct(word) {
                0x01 => Tlbr,
                0x02 => Tlbwi,
                0x06 => Tlbwr,
                0x08 => Tlbp,
                0x18 => Eret,
                _ => return Decoded::Invalid,
            },
            _ => return Decoded::Reserved,
        };
        Decoded::Op(operation)
    }

    fn cop1(word: u32) -> Decoded {
        use Operation::*;

        let operation = match rs(word) {
            0x00 => Mfc1,
            0x01 => Dmfc1,
            0x02 => Cfc1,
            0x04 => Mtc1,
            0x05 => Dmtc1,
            0x06 => Ctc1,
            0x08 => match rt(word) {
                0x00 => Bc1f,
                0x01 => Bc1t,
                0x02 => Bc1fl,
                0x03 => Bc1tl,
                _ => return Decoded::Invalid,
            },
            0x10 => return Self::fpu_single(funct(word)),
            0x11 => return Self::fpu_double(funct(word)),
            0x14 => match funct(word) {
                0x20 => CvtSW,
                0x21 => CvtDW,
                _ => return Decoded::Invalid,
            },
            0x15 => match funct(word) {
                0x20 => CvtSL,
                0x21 => CvtDL,
                _ => return Decoded::Invalid,
            },
            _ => return Decoded::Reserved,
        };
        Decoded::Op(operation)
    }

    fn fpu_single(function: u8) -> Decoded {
        use Operation::*;

        let operation = match function {
            0x00 => AddS,
            0x01 => SubS,
            0x02 => MulS,
            0x03 => DivS,
            0x04 => SqrtS,
            0x05 => AbsS,
            0x06 => MovS,
            0x07 => NegS,
            0x08 => RoundLS,
            0x09 => TruncLS,
            0x0A => CeilLS,
            0x0B => FloorLS,
            0x0C => RoundWS,
            0x0D => TruncWS,
            0x0E => CeilWS,
            0x0F => FloorWS,
            0x21 => CvtDS,
            0x24 => CvtWS,
            0x25 => CvtLS,
            0x30..=0x3F => COMPARE_SINGLE[usize::from(function & 0x0F)],
            _ => return Decoded::Invalid,
        };
        Decoded::Op(operation)
    }

    fn fpu_double(function: u8) -> Decoded {
        use Operation::*;

        let operation = match function {
            0x00 => AddD,
            0x01 => SubD,
            0x02 => MulD,
            0x03 => DivD,
            0x04 => SqrtD,
            0x05 => AbsD,
            0x06 => MovD,
            0x07 => NegD,
            0x08 => RoundLD,
            0x09 => TruncLD,
            0x0A => CeilLD,
            0x0B => FloorLD,
            0x0C => RoundWD,
            0x0D => TruncWD,
            0x0E => CeilWD,
            0x0F => FloorWD,
            0x20 => CvtSD,
            0x24 => CvtWD,
            0x25 => CvtLD,
            0x30..=0x3F => COMPARE_DOUBLE[usize::from(function & 0x0F)],
            _ => return Decoded::Invalid,
        };
        Decoded::Op(operation)
    }

    fn cop2(word: u32) -> Decoded {
        use Operation::*;

        let operation = match rs(word) {
            0x00 => Mfc2,
            0x02 => Cfc2,
            0x04 => Mtc2,
            0x06 => Ctc2,
            _ => return Decoded::Reserved,
        };
        Decoded::Op(operation)
    }
}
