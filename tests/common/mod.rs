//! Helpers shared by the integration tests

use cadical::Solver;
use puzzle2sat::{translate, DimacsFormula, EncodingPolicy, PuzzleKind};
use std::collections::HashMap;

pub fn formula(kind: PuzzleKind, grid: &str, policy: EncodingPolicy, steps: usize) -> DimacsFormula {
    translate(grid.as_bytes(), kind, policy, steps).unwrap()
}

/// Truth values of the named atoms in a model
pub struct Model {
    values: HashMap<String, bool>,
}

impl Model {
    pub fn holds(&self, name: &str) -> bool {
        self.values.get(name).copied().unwrap_or(false)
    }
}

fn variables_by_name(formula: &DimacsFormula) -> HashMap<String, i32> {
    formula
        .variables()
        .atoms()
        .map(|(id, atom)| (atom.to_string(), id))
        .collect()
}

/// Solve `formula` with extra unit literals written as atom names, `!`
/// marking negation
pub fn solve_with(formula: &DimacsFormula, units: &[&str]) -> Option<Model> {
    let names = variables_by_name(formula);
    let mut solver: Solver = Solver::new();
    for clause in formula.clauses() {
        solver.add_clause(clause.iter().copied());
    }
    for unit in units {
        let (name, positive) = match unit.strip_prefix('!') {
            Some(name) => (name, false),
            None => (*unit, true),
        };
        let id = names[name];
        solver.add_clause(std::iter::once(if positive { id } else { -id }));
    }

    if solver.solve() != Some(true) {
        return None;
    }
    let values = names
        .into_iter()
        .map(|(name, id)| {
            let value = solver.value(id).unwrap_or(false);
            (name, value)
        })
        .collect();
    Some(Model { values })
}

pub fn solve(formula: &DimacsFormula) -> Option<Model> {
    solve_with(formula, &[])
}
