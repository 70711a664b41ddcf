//! Clause store and DIMACS emission

use std::collections::BTreeMap;
use std::io::{self, Write};

use super::cardinality::CounterAllocator;
use super::constraints::Clause;
use super::variables::{Atom, VariableManager, VariableStatistics};

/// Append-only CNF formula over numbered atoms
///
/// Owns the atom numbering and the sequential-counter allocator of one
/// translation run.
#[derive(Debug, Default)]
pub struct DimacsFormula {
    variables: VariableManager,
    counters: CounterAllocator,
    clauses: Vec<Vec<i32>>,
}

impl DimacsFormula {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a clause, numbering new atoms in order of appearance.
    /// Empty clauses are ignored.
    pub fn add_clause(&mut self, clause: &Clause) {
        if clause.is_empty() {
            return;
        }
        let literals = clause
            .literals
            .iter()
            .map(|&lit| self.variables.literal(lit))
            .collect();
        self.clauses.push(literals);
    }

    pub fn add_clauses<'a>(&mut self, clauses: impl IntoIterator<Item = &'a Clause>) {
        for clause in clauses {
            self.add_clause(clause);
        }
    }

    /// Allocator for sequential-counter auxiliaries
    pub fn counters(&mut self) -> &mut CounterAllocator {
        &mut self.counters
    }

    pub fn variables(&self) -> &VariableManager {
        &self.variables
    }

    /// Number of an atom already used in some clause
    pub fn variable(&self, atom: &Atom) -> Option<i32> {
        self.variables.lookup(atom)
    }

    pub fn clauses(&self) -> &[Vec<i32>] {
        &self.clauses
    }

    pub fn variable_count(&self) -> usize {
        self.variables.variable_count()
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Write the formula in DIMACS CNF: one `c <n> <name>` line per atom,
    /// the `p cnf` header, then one zero-terminated line per clause.
    pub fn write_dimacs<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (id, atom) in self.variables.atoms() {
            writeln!(out, "c {} {}", id, atom)?;
        }
        writeln!(out, "p cnf {} {}", self.variable_count(), self.clause_count())?;
        for clause in &self.clauses {
            for literal in clause {
                write!(out, "{} ", literal)?;
            }
            writeln!(out, "0")?;
        }
        out.flush()
    }

    /// DIMACS text of the formula
    pub fn to_dimacs_string(&self) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_dimacs(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Get encoding statistics
    pub fn statistics(&self) -> EncodingStatistics {
        let mut clause_lengths = BTreeMap::new();
        for clause in &self.clauses {
            *clause_lengths.entry(clause.len()).or_insert(0) += 1;
        }
        let literal_count = self.clauses.iter().map(Vec::len).sum();

        EncodingStatistics {
            variables: self.variables.statistics(),
            clause_count: self.clause_count(),
            literal_count,
            clause_lengths,
            counters: self.counters.issued(),
        }
    }
}

/// Statistics about an encoded formula
#[derive(Debug, Clone, serde::Serialize)]
pub struct EncodingStatistics {
    pub variables: VariableStatistics,
    pub clause_count: usize,
    pub literal_count: usize,
    /// Number of clauses per clause length
    pub clause_lengths: BTreeMap<usize, usize>,
    pub counters: u32,
}

impl std::fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.variables)?;
        writeln!(f, "Clause Statistics:")?;
        writeln!(f, "  Total clauses: {}", self.clause_count)?;
        writeln!(f, "  Total literals: {}", self.literal_count)?;
        writeln!(f, "  Sequential counters: {}", self.counters)?;
        for (length, count) in &self.clause_lengths {
            writeln!(f, "  Length {:>2}: {}", length, count)?;
        }
        Ok(())
    }
}
