//! Clause construction helpers

use super::variables::Lit;

/// Represents a SAT clause (disjunction of literals)
///
/// An empty clause stands for falsity. The store drops empty clauses, so they
/// only matter when another clause is built on top of them with [`Clause::with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<Lit>,
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<Lit>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: Lit) -> Self {
        Self { literals: vec![literal] }
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: Lit, lit2: Lit) -> Self {
        Self { literals: vec![lit1, lit2] }
    }

    /// Disjunction of `prefix` and this clause, prefix first
    pub fn with(&self, prefix: &[Lit]) -> Self {
        let mut literals = Vec::with_capacity(prefix.len() + self.literals.len());
        literals.extend_from_slice(prefix);
        literals.extend_from_slice(&self.literals);
        Self { literals }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Check if clause is unit
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }
}

impl From<Vec<Lit>> for Clause {
    fn from(literals: Vec<Lit>) -> Self {
        Self::new(literals)
    }
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self.literals.iter().map(ToString::to_string).collect();
        write!(f, "({})", rendered.join(" | "))
    }
}

/// Compile `a1 | a2 | .. => c1 & c2 & ..` into binary clauses.
///
/// The antecedent is read as a disjunction; one clause `!a | c` is produced for
/// every pair, antecedent-major.
pub fn implication(antecedent: &[Lit], consequent: &[Lit]) -> Vec<Clause> {
    let mut clauses = Vec::with_capacity(antecedent.len() * consequent.len());
    for &a in antecedent {
        for &c in consequent {
            clauses.push(Clause::binary(!a, c));
        }
    }
    clauses
}

/// Pairwise at-most-one over `literals`
pub fn at_most_one_pairwise(literals: &[Lit]) -> Vec<Clause> {
    let mut clauses = Vec::new();
    for (index, &first) in literals.iter().enumerate() {
        for &second in &literals[index + 1..] {
            clauses.push(Clause::binary(!first, !second));
        }
    }
    clauses
}
