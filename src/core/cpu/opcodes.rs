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

//! Operation catalog metadata
//!
//! Every supported MIPS I-IV / R4300i operation is a variant of the closed
//! [`Operation`] enum. Each variant carries a static [`OperationMetadata`]
//! entry: display name, description, operand layout, restrictions and the
//! ISA revision that introduced it.
//!
//! The table is generated from a single list so the enum, [`Operation::all`]
//! and [`Operation::metadata`] can never drift apart.

use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Behavioural restrictions and properties of an operation
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    #[serde(transparent)]
    pub struct Restrictions: u32 {
        /// PC-relative conditional (or always-taken) branch
        const BRANCH = 1 << 0;
        /// Delay slot is nullified when the branch is not taken
        const LIKELY = 1 << 1;
        /// Writes the return address register
        const LINK = 1 << 2;
        /// Absolute or register jump
        const JUMP = 1 << 3;
        /// Reads memory
        const LOAD = 1 << 4;
        /// Writes memory
        const STORE = 1 << 5;
        /// Conditionally raises a trap exception
        const TRAP = 1 << 6;
        /// Only executable in kernel mode
        const PRIVILEGED = 1 << 7;
        /// Floating point unit operation
        const FLOAT = 1 << 8;
        /// Operates on 64-bit quantities
        const DOUBLEWORD = 1 << 9;
        /// Followed by a branch delay slot
        const DELAY_SLOT = 1 << 10;
    }
}

/// ISA revision that introduced an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum MipsVersion {
    #[serde(rename = "MIPS I")]
    I,
    #[serde(rename = "MIPS II")]
    II,
    #[serde(rename = "MIPS III")]
    III,
    #[serde(rename = "MIPS IV")]
    IV,
}

/// How the operands of an operation are laid out in the rendered text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperandLayout {
    None,
    RdRsRt,
    RdRtRs,
    RdRtSa,
    RdRs,
    RdRsCc,
    RsRt,
    Rs,
    Rd,
    Code,
    RtRsImm,
    RtRsUimm,
    RtUimm,
    RsRtOffset,
    RsOffset,
    RsImm,
    Offset,
    Target,
    RtOffsetBase,
    FtOffsetBase,
    CopOffsetBase,
    OpOffsetBase,
    RtCop0,
    RtFs,
    RtFcr,
    RtCop2,
    FdFsFt,
    FdFs,
    FsFt,
}

impl OperandLayout {
    /// Operand description for documentation output
    pub fn operand_string(self) -> &'static str {
        match self {
            OperandLayout::None => "",
            OperandLayout::RdRsRt => "rd, rs, rt",
            OperandLayout::RdRtRs => "rd, rt, rs",
            OperandLayout::RdRtSa => "rd, rt, sa",
            OperandLayout::RdRs => "rd, rs",
            OperandLayout::RdRsCc => "rd, rs, cc",
            OperandLayout::RsRt => "rs, rt",
            OperandLayout::Rs => "rs",
            OperandLayout::Rd => "rd",
            OperandLayout::Code => "code",
            OperandLayout::RtRsImm => "rt, rs, immediate",
            OperandLayout::RtRsUimm => "rt, rs, immediate",
            OperandLayout::RtUimm => "rt, immediate",
            OperandLayout::RsRtOffset => "rs, rt, offset",
            OperandLayout::RsOffset => "rs, offset",
            OperandLayout::RsImm => "rs, immediate",
            OperandLayout::Offset => "offset",
            OperandLayout::Target => "target",
            OperandLayout::RtOffsetBase => "rt, offset(base)",
            OperandLayout::FtOffsetBase => "ft, offset(base)",
            OperandLayout::CopOffsetBase => "rt, offset(base)",
            OperandLayout::OpOffsetBase => "op, offset(base)",
            OperandLayout::RtCop0 => "rt, rd",
            OperandLayout::RtFs => "rt, fs",
            OperandLayout::RtFcr => "rt, fs",
            OperandLayout::RtCop2 => "rt, rd",
            OperandLayout::FdFsFt => "fd, fs, ft",
            OperandLayout::FdFs => "fd, fs",
            OperandLayout::FsFt => "fs, ft",
        }
    }

    /// Whether this layout writes a general purpose register that, when it is
    /// `$zero`, turns the whole instruction into a no-op
    pub fn writes_gpr_destination(self) -> bool {
        matches!(
            self,
            OperandLayout::RdRsRt
                | OperandLayout::RdRtRs
                | OperandLayout::RdRtSa
                | OperandLayout::RdRsCc
                | OperandLayout::Rd
                | OperandLayout::RtRsImm
                | OperandLayout::RtRsUimm
                | OperandLayout::RtUimm
        )
    }
}

/// Static, read-only catalog entry for one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperationMetadata {
    pub name: &'static str,
    pub description: &'static str,
    pub operands: &'static str,
    pub layout: OperandLayout,
    pub restrictions: Restrictions,
    pub version: MipsVersion,
}

const B: Restrictions = Restrictions::BRANCH.union(Restrictions::DELAY_SLOT);
const BL: Restrictions = B.union(Restrictions::LIKELY);
const BAL: Restrictions = B.union(Restrictions::LINK);
const BALL: Restrictions = BL.union(Restrictions::LINK);
const J: Restrictions = Restrictions::JUMP.union(Restrictions::DELAY_SLOT);
const JAL: Restrictions = J.union(Restrictions::LINK);
const LD: Restrictions = Restrictions::LOAD;
const ST: Restrictions = Restrictions::STORE;
const LD64: Restrictions = LD.union(Restrictions::DOUBLEWORD);
const ST64: Restrictions = ST.union(Restrictions::DOUBLEWORD);
const TR: Restrictions = Restrictions::TRAP;
const K: Restrictions = Restrictions::PRIVILEGED;
const DW: Restrictions = Restrictions::DOUBLEWORD;
const F: Restrictions = Restrictions::FLOAT;
const FDW: Restrictions = F.union(DW);
const FB: Restrictions = B.union(F);
const FBL: Restrictions = BL.union(F);
const NONE: Restrictions = Restrictions::empty();

macro_rules! operations {
    ($( $variant:ident => $name:literal, $desc:literal, $layout:ident, $flags:expr, $version:ident; )*) => {
        /// A concrete, decodable MIPS operation
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Operation {
            $( $variant, )*
        }

        const ALL_OPERATIONS: &[Operation] = &[ $( Operation::$variant, )* ];

        impl Operation {
            /// Catalog entry for this operation
            pub fn metadata(self) -> OperationMetadata {
                match self {
                    $(
                        Operation::$variant => OperationMetadata {
                            name: $name,
                            description: $desc,
                            operands: OperandLayout::$layout.operand_string(),
                            layout: OperandLayout::$layout,
                            restrictions: $flags,
                            version: MipsVersion::$version,
                        },
                    )*
                }
            }
        }
    };
}

operations! {
    // SPECIAL (opcode 0x00)
    Sll => "sll", "Shift Word Left Logical", RdRtSa, NONE, I;
    Srl => "srl", "Shift Word Right Logical", RdRtSa, NONE, I;
    Sra => "sra", "Shift Word Right Arithmetic", RdRtSa, NONE, I;
    Sllv => "sllv", "Shift Word Left Logical Variable", RdRtRs, NONE, I;
    Srlv => "srlv", "Shift Word Right Logical Variable", RdRtRs, NONE, I;
    Srav => "srav", "Shift Word Right Arithmetic Variable", RdRtRs, NONE, I;
    Jr => "jr", "Jump Register", Rs, J, I;
    Jalr => "jalr", "Jump And Link Register", RdRs, JAL, I;
    Movz => "movz", "Move Conditional on Zero", RdRsRt, NONE, IV;
    Movn => "movn", "Move Conditional on Not Zero", RdRsRt, NONE, IV;
    Movf => "movf", "Move Conditional on Floating Point False", RdRsCc, F, IV;
    Movt => "movt", "Move Conditional on Floating Point True", RdRsCc, F, IV;
    Syscall => "syscall", "System Call", Code, NONE, I;
    Break => "break", "Breakpoint", Code, NONE, I;
    Sync => "sync", "Synchronize Shared Memory", None, NONE, II;
    Mfhi => "mfhi", "Move From HI Register", Rd, NONE, I;
    Mthi => "mthi", "Move To HI Register", Rs, NONE, I;
    Mflo => "mflo", "Move From LO Register", Rd, NONE, I;
    Mtlo => "mtlo", "Move To LO Register", Rs, NONE, I;
    Dsllv => "dsllv", "Doubleword Shift Left Logical Variable", RdRtRs, DW, III;
    Dsrlv => "dsrlv", "Doubleword Shift Right Logical Variable", RdRtRs, DW, III;
    Dsrav => "dsrav", "Doubleword Shift Right Arithmetic Variable", RdRtRs, DW, III;
    Mult => "mult", "Multiply Word", RsRt, NONE, I;
    Multu => "multu", "Multiply Unsigned Word", RsRt, NONE, I;
    Div => "div", "Divide Word", RsRt, NONE, I;
    Divu => "divu", "Divide Unsigned Word", RsRt, NONE, I;
    Dmult => "dmult", "Doubleword Multiply", RsRt, DW, III;
    Dmultu => "dmultu", "Doubleword Multiply Unsigned", RsRt, DW, III;
    Ddiv => "ddiv", "Doubleword Divide", RsRt, DW, III;
    Ddivu => "ddivu", "Doubleword Divide Unsigned", RsRt, DW, III;
    Add => "add", "Add Word", RdRsRt, NONE, I;
    Addu => "addu", "Add Unsigned Word", RdRsRt, NONE, I;
    Sub => "sub", "Subtract Word", RdRsRt, NONE, I;
    Subu => "subu", "Subtract Unsigned Word", RdRsRt, NONE, I;
    And => "and", "And", RdRsRt, NONE, I;
    Or => "or", "Or", RdRsRt, NONE, I;
    Xor => "xor", "Exclusive Or", RdRsRt, NONE, I;
    Nor => "nor", "Not Or", RdRsRt, NONE, I;
    Slt => "slt", "Set on Less Than", RdRsRt, NONE, I;
    Sltu => "sltu", "Set on Less Than Unsigned", RdRsRt, NONE, I;
    Dadd => "dadd", "Doubleword Add", RdRsRt, DW, III;
    Daddu => "daddu", "Doubleword Add Unsigned", RdRsRt, DW, III;
    Dsub => "dsub", "Doubleword Subtract", RdRsRt, DW, III;
    Dsubu => "dsubu", "Doubleword Subtract Unsigned", RdRsRt, DW, III;
    Tge => "tge", "Trap if Greater or Equal", RsRt, TR, II;
    Tgeu => "tgeu", "Trap if Greater or Equal Unsigned", RsRt, TR, II;
    Tlt => "tlt", "Trap if Less Than", RsRt, TR, II;
    Tltu => "tltu", "Trap if Less Than Unsigned", RsRt, TR, II;
    Teq => "teq", "Trap if Equal", RsRt, TR, II;
    Tne => "tne", "Trap if Not Equal", RsRt, TR, II;
    Dsll => "dsll", "Doubleword Shift Left Logical", RdRtSa, DW, III;
    Dsrl => "dsrl", "Doubleword Shift Right Logical", RdRtSa, DW, III;
    Dsra => "dsra", "Doubleword Shift Right Arithmetic", RdRtSa, DW, III;
    Dsll32 => "dsll32", "Doubleword Shift Left Logical Plus 32", RdRtSa, DW, III;
    Dsrl32 => "dsrl32", "Doubleword Shift Right Logical Plus 32", RdRtSa, DW, III;
    Dsra32 => "dsra32", "Doubleword Shift Right Arithmetic Plus 32", RdRtSa, DW, III;

    // REGIMM (opcode 0x01)
    Bltz => "bltz", "Branch on Less Than Zero", RsOffset, B, I;
    Bgez => "bgez", "Branch on Greater Than or Equal to Zero", RsOffset, B, I;
    Bltzl => "bltzl", "Branch on Less Than Zero Likely", RsOffset, BL, II;
    Bgezl => "bgezl", "Branch on Greater Than or Equal to Zero Likely", RsOffset, BL, II;
    Tgei => "tgei", "Trap if Greater or Equal Immediate", RsImm, TR, II;
    Tgeiu => "tgeiu", "Trap if Greater or Equal Immediate Unsigned", RsImm, TR, II;
    Tlti => "tlti", "Trap if Less Than Immediate", RsImm, TR, II;
    Tltiu => "tltiu", "Trap if Less Than Immediate Unsigned", RsImm, TR, II;
    Teqi => "teqi", "Trap if Equal Immediate", RsImm, TR, II;
    Tnei => "tnei", "Trap if Not Equal Immediate", RsImm, TR, II;
    Bltzal => "bltzal", "Branch on Less Than Zero And Link", RsOffset, BAL, I;
    Bgezal => "bgezal", "Branch on Greater Than or Equal to Zero And Link", RsOffset, BAL, I;
    Bltzall => "bltzall", "Branch on Less Than Zero And Link Likely", RsOffset, BALL, II;
    Bgezall => "bgezall", "Branch on Greater Than or Equal to Zero And Link Likely", RsOffset, BALL, II;

    // Primary opcodes
    Jump => "j", "Jump", Target, J, I;
    Jal => "jal", "Jump And Link", Target, JAL, I;
    Beq => "beq", "Branch on Equal", RsRtOffset, B, I;
    Bne => "bne", "Branch on Not Equal", RsRtOffset, B, I;
    Blez => "blez", "Branch on Less Than or Equal to Zero", RsOffset, B, I;
    Bgtz => "bgtz", "Branch on Greater Than Zero", RsOffset, B, I;
    Addi => "addi", "Add Immediate Word", RtRsImm, NONE, I;
    Addiu => "addiu", "Add Immediate Unsigned Word", RtRsImm, NONE, I;
    Slti => "slti", "Set on Less Than Immediate", RtRsImm, NONE, I;
    Sltiu => "sltiu", "Set on Less Than Immediate Unsigned", RtRsImm, NONE, I;
    Andi => "andi", "And Immediate", RtRsUimm, NONE, I;
    Ori => "ori", "Or Immediate", RtRsUimm, NONE, I;
    Xori => "xori", "Exclusive Or Immediate", RtRsUimm, NONE, I;
    Lui => "lui", "Load Upper Immediate", RtUimm, NONE, I;
    Beql => "beql", "Branch on Equal Likely", RsRtOffset, BL, II;
    Bnel => "bnel", "Branch on Not Equal Likely", RsRtOffset, BL, II;
    Blezl => "blezl", "Branch on Less Than or Equal to Zero Likely", RsOffset, BL, II;
    Bgtzl => "bgtzl", "Branch on Greater Than Zero Likely", RsOffset, BL, II;
    Daddi => "daddi", "Doubleword Add Immediate", RtRsImm, DW, III;
    Daddiu => "daddiu", "Doubleword Add Immediate Unsigned", RtRsImm, DW, III;
    Ldl => "ldl", "Load Doubleword Left", RtOffsetBase, LD64, III;
    Ldr => "ldr", "Load Doubleword Right", RtOffsetBase, LD64, III;
    Lb => "lb", "Load Byte", RtOffsetBase, LD, I;
    Lh => "lh", "Load Halfword", RtOffsetBase, LD, I;
    Lwl => "lwl", "Load Word Left", RtOffsetBase, LD, I;
    Lw => "lw", "Load Word", RtOffsetBase, LD, I;
    Lbu => "lbu", "Load Byte Unsigned", RtOffsetBase, LD, I;
    Lhu => "lhu", "Load Halfword Unsigned", RtOffsetBase, LD, I;
    Lwr => "lwr", "Load Word Right", RtOffsetBase, LD, I;
    Lwu => "lwu", "Load Word Unsigned", RtOffsetBase, LD64, III;
    Sb => "sb", "Store Byte", RtOffsetBase, ST, I;
    Sh => "sh", "Store Halfword", RtOffsetBase, ST, I;
    Swl => "swl", "Store Word Left", RtOffsetBase, ST, I;
    Sw => "sw", "Store Word", RtOffsetBase, ST, I;
    Sdl => "sdl", "Store Doubleword Left", RtOffsetBase, ST64, III;
    Sdr => "sdr", "Store Doubleword Right", RtOffsetBase, ST64, III;
    Swr => "swr", "Store Word Right", RtOffsetBase, ST, I;
    Cache => "cache", "Cache Operation", OpOffsetBase, K, III;
    Ll => "ll", "Load Linked Word", RtOffsetBase, LD, II;
    Lwc1 => "lwc1", "Load Word to Floating Point", FtOffsetBase, LD.union(F), I;
    Lwc2 => "lwc2", "Load Word to Coprocessor 2", CopOffsetBase, LD, I;
    Pref => "pref", "Prefetch", OpOffsetBase, NONE, IV;
    Lld => "lld", "Load Linked Doubleword", RtOffsetBase, LD64, III;
    Ldc1 => "ldc1", "Load Doubleword to Floating Point", FtOffsetBase, LD64.union(F), II;
    Ldc2 => "ldc2", "Load Doubleword to Coprocessor 2", CopOffsetBase, LD64, II;
    Ld => "ld", "Load Doubleword", RtOffsetBase, LD64, III;
    Sc => "sc", "Store Conditional Word", RtOffsetBase, ST, II;
    Swc1 => "swc1", "Store Word from Floating Point", FtOffsetBase, ST.union(F), I;
    Swc2 => "swc2", "Store Word from Coprocessor 2", CopOffsetBase, ST, I;
    Scd => "scd", "Store Conditional Doubleword", RtOffsetBase, ST64, III;
    Sdc1 => "sdc1", "Store Doubleword from Floating Point", FtOffsetBase, ST64.union(F), II;
    Sdc2 => "sdc2", "Store Doubleword from Coprocessor 2", CopOffsetBase, ST64, II;
    Sd => "sd", "Store Doubleword", RtOffsetBase, ST64, III;

    // COP0
    Mfc0 => "mfc0", "Move From System Control Coprocessor", RtCop0, K, I;
    Dmfc0 => "dmfc0", "Doubleword Move From System Control Coprocessor", RtCop0, K.union(DW), III;
    Mtc0 => "mtc0", "Move To System Control Coprocessor", RtCop0, K, I;
    Dmtc0 => "dmtc0", "Doubleword Move To System Control Coprocessor", RtCop0, K.union(DW), III;
    Tlbr => "tlbr", "Read Indexed TLB Entry", None, K, III;
    Tlbwi => "tlbwi", "Write Indexed TLB Entry", None, K, III;
    Tlbwr => "tlbwr", "Write Random TLB Entry", None, K, III;
    Tlbp => "tlbp", "Probe TLB for Matching Entry", None, K, III;
    Eret => "eret", "Exception Return", None, K, III;

    // COP1 moves and branches
    Mfc1 => "mfc1", "Move Word From Floating Point", RtFs, F, I;
    Dmfc1 => "dmfc1", "Doubleword Move From Floating Point", RtFs, FDW, III;
    Cfc1 => "cfc1", "Move Control Word From Floating Point", RtFcr, F, I;
    Mtc1 => "mtc1", "Move Word To Floating Point", RtFs, F, I;
    Dmtc1 => "dmtc1", "Doubleword Move To Floating Point", RtFs, FDW, III;
    Ctc1 => "ctc1", "Move Control Word To Floating Point", RtFcr, F, I;
    Bc1f => "bc1f", "Branch on FP False", Offset, FB, I;
    Bc1t => "bc1t", "Branch on FP True", Offset, FB, I;
    Bc1fl => "bc1fl", "Branch on FP False Likely", Offset, FBL, II;
    Bc1tl => "bc1tl", "Branch on FP True Likely", Offset, FBL, II;

    // COP1 arithmetic
    AddS => "add.s", "Floating Point Add (single)", FdFsFt, F, I;
    AddD => "add.d", "Floating Point Add (double)", FdFsFt, F, I;
    SubS => "sub.s", "Floating Point Subtract (single)", FdFsFt, F, I;
    SubD => "sub.d", "Floating Point Subtract (double)", FdFsFt, F, I;
    MulS => "mul.s", "Floating Point Multiply (single)", FdFsFt, F, I;
    MulD => "mul.d", "Floating Point Multiply (double)", FdFsFt, F, I;
    DivS => "div.s", "Floating Point Divide (single)", FdFsFt, F, I;
    DivD => "div.d", "Floating Point Divide (double)", FdFsFt, F, I;
    SqrtS => "sqrt.s", "Floating Point Square Root (single)", FdFs, F, II;
    SqrtD => "sqrt.d", "Floating Point Square Root (double)", FdFs, F, II;
    AbsS => "abs.s", "Floating Point Absolute Value (single)", FdFs, F, I;
    AbsD => "abs.d", "Floating Point Absolute Value (double)", FdFs, F, I;
    MovS => "mov.s", "Floating Point Move (single)", FdFs, F, I;
    MovD => "mov.d", "Floating Point Move (double)", FdFs, F, I;
    NegS => "neg.s", "Floating Point Negate (single)", FdFs, F, I;
    NegD => "neg.d", "Floating Point Negate (double)", FdFs, F, I;
    RoundLS => "round.l.s", "Floating Point Round to Long (single)", FdFs, FDW, III;
    RoundLD => "round.l.d", "Floating Point Round to Long (double)", FdFs, FDW, III;
    TruncLS => "trunc.l.s", "Floating Point Truncate to Long (single)", FdFs, FDW, III;
    TruncLD => "trunc.l.d", "Floating Point Truncate to Long (double)", FdFs, FDW, III;
    CeilLS => "ceil.l.s", "Floating Point Ceiling to Long (single)", FdFs, FDW, III;
    CeilLD => "ceil.l.d", "Floating Point Ceiling to Long (double)", FdFs, FDW, III;
    FloorLS => "floor.l.s", "Floating Point Floor to Long (single)", FdFs, FDW, III;
    FloorLD => "floor.l.d", "Floating Point Floor to Long (double)", FdFs, FDW, III;
    RoundWS => "round.w.s", "Floating Point Round to Word (single)", FdFs, F, II;
    RoundWD => "round.w.d", "Floating Point Round to Word (double)", FdFs, F, II;
    TruncWS => "trunc.w.s", "Floating Point Truncate to Word (single)", FdFs, F, II;
    TruncWD => "trunc.w.d", "Floating Point Truncate to Word (double)", FdFs, F, II;
    CeilWS => "ceil.w.s", "Floating Point Ceiling to Word (single)", FdFs, F, II;
    CeilWD => "ceil.w.d", "Floating Point Ceiling to Word (double)", FdFs, F, II;
    FloorWS => "floor.w.s", "Floating Point Floor to Word (single)", FdFs, F, II;
    FloorWD => "floor.w.d", "Floating Point Floor to Word (double)", FdFs, F, II;
    CvtSD => "cvt.s.d", "Floating Point Convert to Single (from double)", FdFs, F, I;
    CvtSW => "cvt.s.w", "Floating Point Convert to Single (from word)", FdFs, F, I;
    CvtSL => "cvt.s.l", "Floating Point Convert to Single (from long)", FdFs, FDW, III;
    CvtDS => "cvt.d.s", "Floating Point Convert to Double (from single)", FdFs, F, I;
    CvtDW => "cvt.d.w", "Floating Point Convert to Double (from word)", FdFs, F, I;
    CvtDL => "cvt.d.l", "Floating Point Convert to Double (from long)", FdFs, FDW, III;
    CvtWS => "cvt.w.s", "Floating Point Convert to Word (from single)", FdFs, F, I;
    CvtWD => "cvt.w.d", "Floating Point Convert to Word (from double)", FdFs, F, I;
    CvtLS => "cvt.l.s", "Floating Point Convert to Long (from single)", FdFs, FDW, III;
    CvtLD => "cvt.l.d", "Floating Point Convert to Long (from double)", FdFs, FDW, III;

    // COP1 compares, single
    CFS => "c.f.s", "Floating Point Compare False (single)", FsFt, F, I;
    CUnS => "c.un.s", "Floating Point Compare Unordered (single)", FsFt, F, I;
    CEqS => "c.eq.s", "Floating Point Compare Equal (single)", FsFt, F, I;
    CUeqS => "c.ueq.s", "Floating Point Compare Unordered or Equal (single)", FsFt, F, I;
    COltS => "c.olt.s", "Floating Point Compare Ordered Less Than (single)", FsFt, F, I;
    CUltS => "c.ult.s", "Floating Point Compare Unordered or Less Than (single)", FsFt, F, I;
    COleS => "c.ole.s", "Floating Point Compare Ordered Less or Equal (single)", FsFt, F, I;
    CUleS => "c.ule.s", "Floating Point Compare Unordered or Less or Equal (single)", FsFt, F, I;
    CSfS => "c.sf.s", "Floating Point Compare Signaling False (single)", FsFt, F, I;
    CNgleS => "c.ngle.s", "Floating Point Compare Not Greater, Less or Equal (single)", FsFt, F, I;
    CSeqS => "c.seq.s", "Floating Point Compare Signaling Equal (single)", FsFt, F, I;
    CNglS => "c.ngl.s", "Floating Point Compare Not Greater or Less (single)", FsFt, F, I;
    CLtS => "c.lt.s", "Floating Point Compare Less Than (single)", FsFt, F, I;
    CNgeS => "c.nge.s", "Floating Point Compare Not Greater or Equal (single)", FsFt, F, I;
    CLeS => "c.le.s", "Floating Point Compare Less or Equal (single)", FsFt, F, I;
    CNgtS => "c.ngt.s", "Floating Point Compare Not Greater Than (single)", FsFt, F, I;

    // COP1 compares, double
    CFD => "c.f.d", "Floating Point Compare False (double)", FsFt, F, I;
    CUnD => "c.un.d", "Floating Point Compare Unordered (double)", FsFt, F, I;
    CEqD => "c.eq.d", "Floating Point Compare Equal (double)", FsFt, F, I;
    CUeqD => "c.ueq.d", "Floating Point Compare Unordered or Equal (double)", FsFt, F, I;
    COltD => "c.olt.d", "Floating Point Compare Ordered Less Than (double)", FsFt, F, I;
    CUltD => "c.ult.d", "Floating Point Compare Unordered or Less Than (double)", FsFt, F, I;
    COleD => "c.ole.d", "Floating Point Compare Ordered Less or Equal (double)", FsFt, F, I;
    CUleD => "c.ule.d", "Floating Point Compare Unordered or Less or Equal (double)", FsFt, F, I;
    CSfD => "c.sf.d", "Floating Point Compare Signaling False (double)", FsFt, F, I;
    CNgleD => "c.ngle.d", "Floating Point Compare Not Greater, Less or Equal (double)", FsFt, F, I;
    CSeqD => "c.seq.d", "Floating Point Compare Signaling Equal (double)", FsFt, F, I;
    CNglD => "c.ngl.d", "Floating Point Compare Not Greater or Less (double)", FsFt, F, I;
    CLtD => "c.lt.d", "Floating Point Compare Less Than (double)", FsFt, F, I;
    CNgeD => "c.nge.d", "Floating Point Compare Not Greater or Equal (double)", FsFt, F, I;
    CLeD => "c.le.d", "Floating Point Compare Less or Equal (double)", FsFt, F, I;
    CNgtD => "c.ngt.d", "Floating Point Compare Not Greater Than (double)", FsFt, F, I;

    // COP2
    Mfc2 => "mfc2", "Move Word From Coprocessor 2", RtCop2, NONE, I;
    Cfc2 => "cfc2", "Move Control From Coprocessor 2", RtCop2, NONE, I;
    Mtc2 => "mtc2", "Move Word To Coprocessor 2", RtCop2, NONE, I;
    Ctc2 => "ctc2", "Move Control To Coprocessor 2", RtCop2, NONE, I;
}

/// Single-precision compare operations, indexed by `funct & 0xF`
pub(super) const COMPARE_SINGLE: [Operation; 16] = [
    Operation::CFS,
    Operation::CUnS,
    Operation::CEqS,
    Operation::CUeqS,
    Operation::COltS,
    Operation::CUltS,
    Operation::COleS,
    Operation::CUleS,
    Operation::CSfS,
    Operation::CNgleS,
    Operation::CSeqS,
    Operation::CNglS,
    Operation::CLtS,
    Operation::CNgeS,
    Operation::CLeS,
    Operation::CNgtS,
];

/// Double-precision compare operations, indexed by `funct & 0xF`
pub(super) const COMPARE_DOUBLE: [Operation; 16] = [
    Operation::CFD,
    Operation::CUnD,
    Operation::CEqD,
    Operation::CUeqD,
    Operation::COltD,
    Operation::CUltD,
    Operation::COleD,
    Operation::CUleD,
    Operation::CSfD,
    Operation::CNgleD,
    Operation::CSeqD,
    Operation::CNglD,
    Operation::CLtD,
    Operation::CNgeD,
    Operation::CLeD,
    Operation::CNgtD,
];

impl Operation {
    /// Every operation in the catalog, in table order
    pub fn all() -> &'static [Operation] {
        ALL_OPERATIONS
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.metadata().name
    }

    #[inline]
    pub fn restrictions(self) -> Restrictions {
        self.metadata().restrictions
    }

    /// Conditional or always-taken PC-relative branch (including FPU branches)
    #[inline]
    pub fn is_branch(self) -> bool {
        self.restrictions().contains(Restrictions::BRANCH)
    }

    /// Branch whose delay slot is nullified when not taken
    #[inline]
    pub fn is_likely(self) -> bool {
        self.restrictions().contains(Restrictions::LIKELY)
    }

    /// `j`, `jal`, `jr` or `jalr`
    #[inline]
    pub fn is_jump(self) -> bool {
        self.restrictions().contains(Restrictions::JUMP)
    }

    /// Memory access through `offset(base)`
    #[inline]
    pub fn is_load_or_store(self) -> bool {
        self.restrictions()
            .intersects(Restrictions::LOAD | Restrictions::STORE)
            && self.metadata().layout != OperandLayout::OpOffsetBase
    }

    /// General purpose register written by this operation, if any
    pub fn gpr_destination(self, word: u32) -> Option<u8> {
        use super::decode::{rd, rt};

        let meta = self.metadata();
        match meta.layout {
            OperandLayout::RdRsRt
            | OperandLayout::RdRtRs
            | OperandLayout::RdRtSa
            | OperandLayout::RdRsCc
            | OperandLayout::Rd
            | OperandLayout::RdRs => Some(rd(word)),
            OperandLayout::RtRsImm | OperandLayout::RtRsUimm | OperandLayout::RtUimm => {
                Some(rt(word))
            }
            OperandLayout::RtOffsetBase if meta.restrictions.contains(Restrictions::LOAD) => {
                Some(rt(word))
            }
            _ => match self {
                Operation::Mfc0
                | Operation::Dmfc0
                | Operation::Mfc1
                | Operation::Dmfc1
                | Operation::Cfc1
                | Operation::Mfc2
                | Operation::Cfc2 => Some(rt(word)),
                Operation::Jal
                | Operation::Bltzal
                | Operation::Bgezal
                | Operation::Bltzall
                | Operation::Bgezall => Some(super::registers::RA),
                _ => None,
            },
        }
    }
}
