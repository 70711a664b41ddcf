//! Cardinality constraints over a family of literals
//!
//! Two strategies are provided. [`binomial`] enumerates subsets and suits the
//! short neighbour lists of the reachability encoding; [`sequential`] is the
//! Sinz sequential counter, linear in `n * k`, used for constraints over every
//! location of the grid.
//!
//! "At least k" is always "at most n - k" over the negated family. When `k`
//! exceeds the family size the constraint cannot hold and a single empty clause
//! is returned, which forbids whatever prefix the caller puts in front of it.

use itertools::Itertools;

use super::constraints::Clause;
use super::variables::{Atom, Kind, Lit};

fn negated(literals: &[Lit]) -> Vec<Lit> {
    literals.iter().map(|&lit| !lit).collect()
}

/// Subset-enumeration encodings
pub mod binomial {
    use super::*;

    /// At most `k` of `literals` hold: one clause per `(k + 1)`-subset.
    ///
    /// Subsets come out in lexicographic order of positions (first element
    /// fixed, remainder enumerated recursively).
    pub fn at_most(k: usize, literals: &[Lit]) -> Vec<Clause> {
        literals
            .iter()
            .copied()
            .combinations(k + 1)
            .map(|subset| Clause::new(negated(&subset)))
            .collect()
    }

    /// At least `k` of `literals` hold
    pub fn at_least(k: usize, literals: &[Lit]) -> Vec<Clause> {
        if k > literals.len() {
            return vec![Clause::default()];
        }
        at_most(literals.len() - k, &negated(literals))
    }

    /// Exactly `k` of `literals` hold
    pub fn exactly(k: usize, literals: &[Lit]) -> Vec<Clause> {
        let mut clauses = at_most(k, literals);
        clauses.extend(at_least(k, literals));
        clauses
    }
}

/// Issues fresh identifiers for sequential-counter auxiliaries.
///
/// One allocator lives in each formula and is never reset, so running-sum atoms
/// of different counters never collide.
#[derive(Debug, Default, Clone)]
pub struct CounterAllocator {
    issued: u32,
}

impl CounterAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> u32 {
        self.issued += 1;
        self.issued
    }

    /// Number of counters issued so far
    pub fn issued(&self) -> u32 {
        self.issued
    }
}

/// Sinz sequential-counter encodings
///
/// The running sum `s(i, j)` means "at least `j` of the first `i` literals
/// hold". Auxiliary atoms are indexed by the counter id and the time step the
/// constraint belongs to.
pub mod sequential {
    use super::*;

    fn counter(k: usize, literals: &[Lit], time: usize, id: u32) -> Vec<Clause> {
        let n = literals.len();
        if k >= n {
            return Vec::new();
        }
        if k == 0 {
            return literals.iter().map(|&lit| Clause::unit(!lit)).collect();
        }

        let sum = |i: usize, j: usize| {
            Atom::global(Kind::Counter { id, i: i as u32, j: j as u32 }, time).pos()
        };
        let x = |i: usize| literals[i - 1];

        let mut clauses = Vec::with_capacity(2 * n * k + n);
        clauses.push(Clause::binary(!x(1), sum(1, 1)));
        for j in 2..=k {
            clauses.push(Clause::unit(!sum(1, j)));
        }
        for i in 2..n {
            clauses.push(Clause::binary(!x(i), sum(i, 1)));
            clauses.push(Clause::binary(!sum(i - 1, 1), sum(i, 1)));
            for j in 2..=k {
                clauses.push(Clause::new(vec![!x(i), !sum(i - 1, j - 1), sum(i, j)]));
                clauses.push(Clause::binary(!sum(i - 1, j), sum(i, j)));
            }
            clauses.push(Clause::binary(!x(i), !sum(i - 1, k)));
        }
        clauses.push(Clause::binary(!x(n), !sum(n - 1, k)));
        clauses
    }

    /// At most `k` of `literals` hold at step `time`
    pub fn at_most(
        k: usize,
        literals: &[Lit],
        time: usize,
        counters: &mut CounterAllocator,
    ) -> Vec<Clause> {
        let id = counters.next_id();
        counter(k, literals, time, id)
    }

    /// At least `k` of `literals` hold at step `time`
    pub fn at_least(
        k: usize,
        literals: &[Lit],
        time: usize,
        counters: &mut CounterAllocator,
    ) -> Vec<Clause> {
        let id = counters.next_id();
        let n = literals.len();
        match k {
            k if k > n => vec![Clause::default()],
            0 => Vec::new(),
            1 => vec![Clause::new(literals.to_vec())],
            k => counter(n - k, &negated(literals), time, id),
        }
    }

    /// Exactly `k` of `literals` hold at step `time`
    pub fn exactly(
        k: usize,
        literals: &[Lit],
        time: usize,
        counters: &mut CounterAllocator,
    ) -> Vec<Clause> {
        let mut clauses = at_most(k, literals, time, counters);
        clauses.extend(at_least(k, literals, time, counters));
        clauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::variables::Fact;
    use std::collections::{BTreeSet, HashMap};

    fn family(n: usize) -> Vec<Lit> {
        (1..=n).map(|loc| Atom::at(Kind::Fact(Fact::Ball), loc, 0).pos()).collect()
    }

    fn holds(clause: &Clause, assignment: &HashMap<Atom, bool>) -> bool {
        clause
            .literals
            .iter()
            .any(|lit| assignment.get(&lit.atom).copied().unwrap_or(false) != lit.negated)
    }

    /// Whether some assignment of the auxiliary atoms satisfies `clauses`
    /// once the family atoms are fixed.
    fn extendable(clauses: &[Clause], fixed: &HashMap<Atom, bool>) -> bool {
        let auxiliary: Vec<Atom> = clauses
            .iter()
            .flat_map(|clause| clause.literals.iter().map(|lit| lit.atom))
            .filter(|atom| !fixed.contains_key(atom))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        (0..1u64 << auxiliary.len()).any(|bits| {
            let mut assignment = fixed.clone();
            for (index, atom) in auxiliary.iter().enumerate() {
                assignment.insert(*atom, bits >> index & 1 == 1);
            }
            clauses.iter().all(|clause| holds(clause, &assignment))
        })
    }

    /// Check `encode` against `accept` over every assignment of a 4-literal family
    fn check_exhaustively(
        encode: impl Fn(usize, &[Lit]) -> Vec<Clause>,
        accept: impl Fn(usize, usize) -> bool,
    ) {
        let literals = family(4);
        for k in 0..=4 {
            let clauses = encode(k, &literals);
            for bits in 0..16u32 {
                let fixed: HashMap<Atom, bool> = literals
                    .iter()
                    .enumerate()
                    .map(|(index, lit)| (lit.atom, bits >> index & 1 == 1))
                    .collect();
                let count = bits.count_ones() as usize;
                assert_eq!(
                    extendable(&clauses, &fixed),
                    accept(count, k),
                    "k = {}, assignment = {:04b}",
                    k,
                    bits
                );
            }
        }
    }

    #[test]
    fn test_binomial_at_most() {
        check_exhaustively(binomial::at_most, |count, k| count <= k);
    }

    #[test]
    fn test_binomial_at_least() {
        check_exhaustively(binomial::at_least, |count, k| count >= k);
    }

    #[test]
    fn test_binomial_exactly() {
        check_exhaustively(binomial::exactly, |count, k| count == k);
    }

    #[test]
    fn test_sequential_at_most() {
        check_exhaustively(
            |k, lits| sequential::at_most(k, lits, 0, &mut CounterAllocator::new()),
            |count, k| count <= k,
        );
    }

    #[test]
    fn test_sequential_at_least() {
        check_exhaustively(
            |k, lits| sequential::at_least(k, lits, 0, &mut CounterAllocator::new()),
            |count, k| count >= k,
        );
    }

    #[test]
    fn test_sequential_exactly() {
        check_exhaustively(
            |k, lits| sequential::exactly(k, lits, 0, &mut CounterAllocator::new()),
            |count, k| count == k,
        );
    }

    #[test]
    fn test_binomial_subset_order() {
        let lits = family(3);
        let clauses = binomial::at_most(1, &lits);
        assert_eq!(
            clauses,
            vec![
                Clause::binary(!lits[0], !lits[1]),
                Clause::binary(!lits[0], !lits[2]),
                Clause::binary(!lits[1], !lits[2]),
            ]
        );
    }

    #[test]
    fn test_at_least_one_is_single_clause() {
        let lits = family(4);
        let expected = vec![Clause::new(lits.clone())];
        assert_eq!(binomial::at_least(1, &lits), expected);
        assert_eq!(
            sequential::at_least(1, &lits, 0, &mut CounterAllocator::new()),
            expected
        );
    }

    #[test]
    fn test_infeasible_at_least() {
        let lits = family(2);
        assert_eq!(binomial::at_least(3, &lits), vec![Clause::default()]);
        assert_eq!(
            sequential::at_least(3, &lits, 0, &mut CounterAllocator::new()),
            vec![Clause::default()]
        );
        assert_eq!(binomial::at_least(1, &[]), vec![Clause::default()]);
    }

    #[test]
    fn test_counter_ids_are_fresh() {
        let lits = family(4);
        let mut counters = CounterAllocator::new();

        let first = sequential::at_most(2, &lits, 3, &mut counters);
        let second = sequential::at_most(2, &lits, 3, &mut counters);
        assert_eq!(counters.issued(), 2);

        let aux = |clauses: &[Clause]| -> BTreeSet<Atom> {
            clauses
                .iter()
                .flat_map(|clause| clause.literals.iter().map(|lit| lit.atom))
                .filter(|atom| matches!(atom.kind, Kind::Counter { .. }))
                .collect()
        };
        let first_aux = aux(&first);
        assert!(!first_aux.is_empty());
        assert!(first_aux.is_disjoint(&aux(&second)));
        assert!(first_aux.iter().all(|atom| atom.time == 3));
    }

    #[test]
    fn test_sequential_clause_count() {
        // n = 5, k = 2: 1 + (k - 1) + (n - 2) * (2 + 2 * (k - 1) + 1) + 1
        let clauses = sequential::at_most(2, &family(5), 0, &mut CounterAllocator::new());
        assert_eq!(clauses.len(), 1 + 1 + 3 * 5 + 1);
    }
}
