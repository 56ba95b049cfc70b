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

//! Thread-safe symbol table
//!
//! Holds every Function, Label, Object, Variable and switch-case address
//! discovered during the metadata pass. Registration is check-then-insert:
//! a shared read lock answers the common "already present" case, and only a
//! likely insert takes the write lock and re-checks. Two different names for
//! the same address abort the run.

use crate::core::config::DisassemblerOptions;
use crate::core::error::{DisassemblerError, Result, SymbolKind};
use crate::core::memory::AddressClassifier;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeBounds;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Prefix marking a variable as a jump table
pub const SWITCH_PREFIX: &str = "__switch";

/// Branch or jump target that is not a function entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomLabel {
    pub address: u32,
}

/// Function entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomFunction {
    pub address: u32,
    pub name: Option<String>,
}

/// Output-unit boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomObject {
    pub address: u32,
    pub size: Option<u32>,
    pub name: Option<String>,
}

/// Data symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomVariable {
    pub address: u32,
    /// Size in bytes, 0 when unknown
    pub size: u32,
    pub name: Option<String>,
}

/// Common view over the four symbol kinds
pub trait Symbol: Clone {
    const KIND: SymbolKind;

    fn address(&self) -> u32;

    /// Caller-supplied name, if any
    fn known_name(&self) -> Option<&str>;

    /// Name generated from the address when no known name exists
    fn generated_name(&self) -> String;

    /// Name used in output
    fn display_name(&self) -> String {
        self.known_name()
            .map(str::to_string)
            .unwrap_or_else(|| self.generated_name())
    }
}

impl Symbol for RomLabel {
    const KIND: SymbolKind = SymbolKind::Label;

    fn address(&self) -> u32 {
        self.address
    }

    fn known_name(&self) -> Option<&str> {
        None
    }

    fn generated_name(&self) -> String {
        format!("L_{:08X}", self.address)
    }
}

impl Symbol for RomFunction {
    const KIND: SymbolKind = SymbolKind::Function;

    fn address(&self) -> u32 {
        self.address
    }

    fn known_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn generated_name(&self) -> String {
        format!("Func_{:08X}", self.address)
    }
}

impl Symbol for RomObject {
    const KIND: SymbolKind = SymbolKind::Object;

    fn address(&self) -> u32 {
        self.address
    }

    fn known_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn generated_name(&self) -> String {
        format!("Object_{:08X}", self.address)
    }
}

impl Symbol for RomVariable {
    const KIND: SymbolKind = SymbolKind::Variable;

    fn address(&self) -> u32 {
        self.address
    }

    fn known_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn generated_name(&self) -> String {
        format!("D_{:08X}", self.address)
    }
}

impl RomVariable {
    /// Whether this variable names a jump table
    pub fn is_switch_table(&self) -> bool {
        self.display_name().starts_with(SWITCH_PREFIX)
    }
}

/// Snapshot of how many symbols of each kind are registered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SymbolCounts {
    pub functions: usize,
    pub labels: usize,
    pub objects: usize,
    pub variables: usize,
    pub switch_cases: usize,
}

/// Address-keyed symbol collections shared by both passes
#[derive(Debug, Default)]
pub struct SymbolTable {
    functions: RwLock<BTreeMap<u32, RomFunction>>,
    labels: RwLock<BTreeMap<u32, RomLabel>>,
    objects: RwLock<BTreeMap<u32, RomObject>>,
    variables: RwLock<BTreeMap<u32, RomVariable>>,
    switch_cases: RwLock<BTreeSet<u32>>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Fail when `proposed` carries a name that differs from `existing`
fn check_compatible<S: Symbol>(existing: &S, proposed: &S) -> Result<()> {
    match proposed.known_name() {
        Some(name) if existing.display_name() != name => Err(DisassemblerError::SymbolConflict {
            kind: S::KIND,
            address: existing.address(),
            existing: existing.display_name(),
            proposed: name.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Check-then-insert into one symbol map
///
/// Returns `true` when the symbol was newly inserted.
fn register<S: Symbol>(lock: &RwLock<BTreeMap<u32, S>>, symbol: S) -> Result<bool> {
    if let Some(existing) = read(lock).get(&symbol.address()) {
        check_compatible(existing, &symbol)?;
        return Ok(false);
    }

    let mut map = write(lock);
    if let Some(existing) = map.get(&symbol.address()) {
        check_compatible(existing, &symbol)?;
        return Ok(false);
    }
    log::debug!("Registered {} {}", S::KIND, symbol.display_name());
    map.insert(symbol.address(), symbol);
    Ok(true)
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table seeded with the caller's known symbols
    ///
    /// Functions are seeded first, then variables, then objects. A known
    /// object inside a code region also registers an implicit function at its
    /// address.
    ///
    /// # Arguments
    ///
    /// * `options` - Known functions, variables and objects
    /// * `classifier` - Used to decide whether an object starts code
    ///
    /// # Returns
    ///
    /// - `Ok(SymbolTable)` on success
    /// - `Err(DisassemblerError::SymbolConflict)` if the known symbols disagree
    pub fn seeded(options: &DisassemblerOptions, classifier: &AddressClassifier) -> Result<Self> {
        let table = Self::new();

        for function in &options.functions {
            table.register_function(function.address, Some(&function.name))?;
        }
        for variable in &options.variables {
            table.register_variable(RomVariable {
                address: variable.address,
                size: variable.size,
                name: Some(variable.name.clone()),
            })?;
        }
        for object in &options.objects {
            table.register_object(RomObject {
                address: object.address,
                size: object.size,
                name: object.name.clone(),
            })?;
            if classifier.is_code_region(object.address) {
                table.register_function(object.address, None)?;
            }
        }

        Ok(table)
    }

    /// Register a branch target
    pub fn register_label(&self, address: u32) -> Result<bool> {
        register(&self.labels, RomLabel { address })
    }

    /// Register a function entry
    ///
    /// # Arguments
    ///
    /// * `address` - Entry address
    /// * `name` - Known name, or `None` to accept whatever is (or will be) generated
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if newly registered, `Ok(false)` if already present with a compatible name
    /// - `Err(DisassemblerError::SymbolConflict)` if a different name is already registered
    ///
    /// # Example
    ///
    /// ```
    /// use n64dis::core::analysis::SymbolTable;
    ///
    /// let table = SymbolTable::new();
    /// assert!(table.register_function(0x80000400, Some("main")).unwrap());
    /// assert!(!table.register_function(0x80000400, Some("main")).unwrap());
    /// assert!(table.register_function(0x80000400, Some("entry")).is_err());
    /// ```
    pub fn register_function(&self, address: u32, name: Option<&str>) -> Result<bool> {
        register(
            &self.functions,
            RomFunction {
                address,
                name: name.map(str::to_string),
            },
        )
    }

    pub fn register_object(&self, object: RomObject) -> Result<bool> {
        register(&self.objects, object)
    }

    pub fn register_variable(&self, variable: RomVariable) -> Result<bool> {
        register(&self.variables, variable)
    }

    /// Register an address reached through a jump table
    pub fn register_switch_case(&self, address: u32) -> bool {
        if read(&self.switch_cases).contains(&address) {
            return false;
        }
        let inserted = write(&self.switch_cases).insert(address);
        if inserted {
            log::debug!("Registered switch case L_{:08X}", address);
        }
        inserted
    }

    pub fn function(&self, address: u32) -> Option<RomFunction> {
        read(&self.functions).get(&address).cloned()
    }

    pub fn label(&self, address: u32) -> Option<RomLabel> {
        read(&self.labels).get(&address).cloned()
    }

    pub fn object(&self, address: u32) -> Option<RomObject> {
        read(&self.objects).get(&address).cloned()
    }

    pub fn variable(&self, address: u32) -> Option<RomVariable> {
        read(&self.variables).get(&address).cloned()
    }

    #[inline]
    pub fn is_switch_case(&self, address: u32) -> bool {
        read(&self.switch_cases).contains(&address)
    }

    /// Display name of a symbol at `address`, searching functions then variables
    pub fn name_at(&self, address: u32) -> Option<String> {
        self.function(address)
            .map(|f| f.display_name())
            .or_else(|| self.variable(address).map(|v| v.display_name()))
    }

    /// Variables starting inside `range`, in address order
    pub fn variables_in<R: RangeBounds<u32>>(&self, range: R) -> Vec<RomVariable> {
        read(&self.variables).range(range).map(|(_, v)| v.clone()).collect()
    }

    /// Variables whose names mark them as jump tables
    pub fn switch_tables(&self) -> Vec<RomVariable> {
        read(&self.variables)
            .values()
            .filter(|v| v.is_switch_table())
            .cloned()
            .collect()
    }

    /// Nearest variable at or below `address`
    ///
    /// # Returns
    ///
    /// `Some((variable_address, offset))` when the address can be attributed
    /// to a variable, `None` otherwise. Attribution fails when there is no
    /// variable at or below `address`, or when the address is closer to the
    /// next variable than to the floor. Variable sizes are not consulted.
    ///
    /// # Example
    ///
    /// ```
    /// use n64dis::core::analysis::{RomVariable, SymbolTable};
    ///
    /// let table = SymbolTable::new();
    /// table.register_variable(RomVariable { address: 0x80100000, size: 0, name: Some("a".into()) }).unwrap();
    /// table.register_variable(RomVariable { address: 0x80100100, size: 0, name: Some("b".into()) }).unwrap();
    ///
    /// assert_eq!(table.variable_offset(0x80100000), Some((0x80100000, 0)));
    /// assert_eq!(table.variable_offset(0x80100010), Some((0x80100000, 0x10)));
    /// assert_eq!(table.variable_offset(0x800FFFFF), None);
    /// ```
    pub fn variable_offset(&self, address: u32) -> Option<(u32, u32)> {
        let variables = read(&self.variables);

        let (&base, _) = variables.range(..=address).next_back()?;
        let offset = address - base;
        if offset == 0 {
            return Some((base, 0));
        }

        if let Some((&next, _)) = variables.range(address..).next() {
            if offset > next - address {
                return None;
            }
        }

        Some((base, offset))
    }

    pub fn counts(&self) -> SymbolCounts {
        SymbolCounts {
            functions: read(&self.functions).len(),
            labels: read(&self.labels).len(),
            objects: read(&self.objects).len(),
            variables: read(&self.variables).len(),
            switch_cases: read(&self.switch_cases).len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory::{DataFile, DataRegion};
    use rayon::prelude::*;

    fn variable(address: u32, size: u32, name: &str) -> RomVariable {
        RomVariable {
            address,
            size,
            name: Some(name.to_string()),
        }
    }

    #[test]
    fn test_generated_names() {
        assert_eq!(RomLabel { address: 0x80000020 }.display_name(), "L_80000020");
        let f = RomFunction {
            address: 0x80400000,
            name: None,
        };
        assert_eq!(f.display_name(), "Func_80400000");
        let o = RomObject {
            address: 0x80000400,
            size: None,
            name: None,
        };
        assert_eq!(o.display_name(), "Object_80000400");
        let v = RomVariable {
            address: 0x80101234,
            size: 4,
            name: None,
        };
        assert_eq!(v.display_name(), "D_80101234");
    }

    #[test]
    fn test_function_conflict_is_fatal() {
        let table = SymbolTable::new();
        table.register_function(0x80000400, Some("main")).unwrap();
        let err = table.register_function(0x80000400, Some("start")).unwrap_err();
        match err {
            DisassemblerError::SymbolConflict {
                kind,
                address,
                existing,
                proposed,
            } => {
                assert_eq!(kind, SymbolKind::Function);
                assert_eq!(address, 0x80000400);
                assert_eq!(existing, "main");
                assert_eq!(proposed, "start");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_function_same_name_is_idempotent() {
        let table = SymbolTable::new();
        assert!(table.register_function(0x80000400, Some("main")).unwrap());
        assert!(!table.register_function(0x80000400, Some("main")).unwrap());
        assert!(!table.register_function(0x80000400, None).unwrap());
        assert_eq!(table.counts().functions, 1);
    }

    #[test]
    fn test_generated_name_matches_itself() {
        let table = SymbolTable::new();
        table.register_function(0x80000400, None).unwrap();
        assert!(table.register_function(0x80000400, Some("Func_80000400")).is_ok());
        assert!(table.register_function(0x80000400, Some("main")).is_err());
    }

    #[test]
    fn test_variable_conflict_is_fatal() {
        let table = SymbolTable::new();
        table.register_variable(variable(0x80100000, 4, "a")).unwrap();
        let err = table.register_variable(variable(0x80100000, 4, "b")).unwrap_err();
        assert!(matches!(
            err,
            DisassemblerError::SymbolConflict {
                kind: SymbolKind::Variable,
                ..
            }
        ));
    }

    #[test]
    fn test_labels_and_switch_cases() {
        let table = SymbolTable::new();
        assert!(table.register_label(0x80000020).unwrap());
        assert!(!table.register_label(0x80000020).unwrap());
        assert!(table.register_switch_case(0x80000040));
        assert!(!table.register_switch_case(0x80000040));
        assert!(table.is_switch_case(0x80000040));
        assert!(table.label(0x80000040).is_none());
    }

    #[test]
    fn test_variable_offset_exact() {
        let table = SymbolTable::new();
        table.register_variable(variable(0x80101234, 0, "gTable")).unwrap();
        assert_eq!(table.variable_offset(0x80101234), Some((0x80101234, 0)));
    }

    #[test]
    fn test_variable_offset_between_variables() {
        let table = SymbolTable::new();
        table.register_variable(variable(0x80100000, 0, "a")).unwrap();
        table.register_variable(variable(0x80100100, 0, "b")).unwrap();
        // Closer to the floor
        assert_eq!(table.variable_offset(0x80100040), Some((0x80100000, 0x40)));
        // Closer to the next variable
        assert_eq!(table.variable_offset(0x801000F0), None);
    }

    #[test]
    fn test_variable_offset_empty_and_before_first() {
        let table = SymbolTable::new();
        assert_eq!(table.variable_offset(0x80100000), None);
        table.register_variable(variable(0x80100000, 0, "a")).unwrap();
        assert_eq!(table.variable_offset(0x800FFFFC), None);
    }

    #[test]
    fn test_variable_offset_ignores_size() {
        let table = SymbolTable::new();
        table.register_variable(variable(0x80100000, 0x10, "a")).unwrap();
        assert_eq!(table.variable_offset(0x8010000C), Some((0x80100000, 0x0C)));
        assert_eq!(table.variable_offset(0x80100020), Some((0x80100000, 0x20)));

        // A later, unrelated variable does not change the attribution
        table.register_variable(variable(0x80100100, 0, "b")).unwrap();
        assert_eq!(table.variable_offset(0x80100020), Some((0x80100000, 0x20)));
    }

    #[test]
    fn test_switch_tables() {
        let table = SymbolTable::new();
        table.register_variable(variable(0x80200000, 0, "__switch_80200000")).unwrap();
        table.register_variable(variable(0x80200100, 0, "gTable")).unwrap();
        let tables = table.switch_tables();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].address, 0x80200000);
    }

    #[test]
    fn test_seeded_registers_implicit_object_function() {
        let file = DataFile::from_words("code", &[0; 0x40], 0x80000000);
        let classifier =
            AddressClassifier::new(&[file], &[DataRegion::new(0x80000080, 0x800000FF).unwrap()]);
        let options = DisassemblerOptions::new()
            .with_function(0x80000000, "main")
            .with_object(0x80000000, Some("boot"), None)
            .with_object(0x80000040, None, None)
            .with_object(0x80000080, Some("data"), None);

        let table = SymbolTable::seeded(&options, &classifier).unwrap();
        assert_eq!(table.function(0x80000000).unwrap().display_name(), "main");
        assert_eq!(table.function(0x80000040).unwrap().display_name(), "Func_80000040");
        // Objects in data regions get no function
        assert!(table.function(0x80000080).is_none());
        assert_eq!(table.counts().objects, 3);
    }

    #[test]
    fn test_seeded_conflicting_known_symbols() {
        let classifier = AddressClassifier::new(&[], &[]);
        let options = DisassemblerOptions::new()
            .with_function(0x80000000, "a")
            .with_function(0x80000000, "b");
        assert!(SymbolTable::seeded(&options, &classifier).is_err());
    }

    #[test]
    fn test_concurrent_registration() {
        let table = SymbolTable::new();
        let inserted: usize = (0..1000u32)
            .into_par_iter()
            .map(|i| {
                let address = 0x80000000 + (i % 100) * 4;
                usize::from(table.register_label(address).unwrap())
            })
            .sum();
        assert_eq!(inserted, 100);
        assert_eq!(table.counts().labels, 100);
    }

    #[test]
    fn test_concurrent_conflict_detected() {
        let table = SymbolTable::new();
        let results: Vec<_> = (0..64u32)
            .into_par_iter()
            .map(|i| {
                let name = if i % 2 == 0 { "even" } else { "odd" };
                table.register_function(0x80000400, Some(name))
            })
            .collect();
        assert!(results.iter().any(|r| r.is_err()));
        assert!(results.iter().any(|r| r.is_ok()));
    }
}
