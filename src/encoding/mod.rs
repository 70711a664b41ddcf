//! Translation of a puzzle instance into CNF
//!
//! One [`Translator`] drives every variant. The puzzle families plug in through
//! [`PuzzleEncoding`]; the shared clause families (action selection, path
//! witnesses, parallel bookkeeping) live in the submodules.

pub mod exclusive;
pub mod literals;
pub mod parallel;
pub mod policy;
pub mod reachability;
pub mod snowman;
pub mod sokoban;

pub use policy::{ActionModel, EncodingPolicy, Preset};

use rayon::prelude::*;
use std::ops::Range;
use tracing::{debug, debug_span, info};

use crate::error::Result;
use crate::grid::{Direction, Topology};
use crate::puzzle::{Puzzle, PuzzleKind};
use crate::sat::{Clause, CounterAllocator, DimacsFormula, Lit};

/// Parameters shared by every clause family of one run
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub topology: &'a Topology,
    pub policy: EncodingPolicy,
    /// Plan horizon N
    pub steps: usize,
}

impl<'a> Context<'a> {
    pub fn locations(&self) -> &'a [usize] {
        self.topology.locations()
    }

    /// Time steps at which an action starts
    pub fn transitions(&self) -> Range<usize> {
        0..self.steps
    }

    pub fn is_parallel(&self) -> bool {
        self.policy.action_model == ActionModel::Parallel
    }

    /// Exclusive model where the actor moves one cell per step
    pub fn is_stepwise(&self) -> bool {
        self.policy.action_model == ActionModel::Exclusive && !self.policy.reachability
    }
}

/// Puzzle-specific clause families
///
/// Every method returns its clauses in emission order; none of them touches
/// the atom numbering.
pub trait PuzzleEncoding: Sync {
    fn topology(&self) -> &Topology;

    /// Unit facts of time step 0
    fn initial_state(&self) -> &[Lit];

    /// State facts meaning "some ball lies on `loc`"
    fn ball_facts(&self, loc: usize, time: usize) -> Vec<Lit>;

    /// Literal that keeps the actor's walk off a cell
    fn walk_blocker(&self, loc: usize, time: usize) -> Lit;

    /// Number of ball actions a parallel step may contain
    fn balls_in_transit(&self) -> usize;

    fn forbidden_constraints(&self, _ctx: &Context) -> Vec<Clause> {
        Vec::new()
    }

    fn auxiliary_constraints(&self, _ctx: &Context) -> Vec<Clause> {
        Vec::new()
    }

    fn action_constraints(&self, ctx: &Context, d: Direction) -> Vec<Clause>;

    fn frame_constraints(&self, ctx: &Context) -> Vec<Clause>;

    fn invariant_constraints(&self, _ctx: &Context, _counters: &mut CounterAllocator) -> Vec<Clause> {
        Vec::new()
    }

    fn goal_constraints(&self, ctx: &Context) -> Vec<Clause>;
}

/// Builds the formula of one puzzle instance for a fixed horizon
pub struct Translator<'a> {
    kind: PuzzleKind,
    encoding: &'a dyn PuzzleEncoding,
    context: Context<'a>,
}

impl<'a> Translator<'a> {
    /// Create a translator, rejecting policies the puzzle has no encoding for
    pub fn new(puzzle: &'a Puzzle, policy: EncodingPolicy, steps: usize) -> Result<Self> {
        let kind = puzzle.kind();
        policy.validate(kind)?;

        let encoding: &'a dyn PuzzleEncoding = match puzzle {
            Puzzle::Snowman(instance) => instance,
            Puzzle::Sokoban(instance) => instance,
        };

        Ok(Self {
            kind,
            encoding,
            context: Context {
                topology: encoding.topology(),
                policy,
                steps,
            },
        })
    }

    pub fn context(&self) -> &Context<'a> {
        &self.context
    }

    /// Generate every clause family in pipeline order
    pub fn translate(&self) -> DimacsFormula {
        let ctx = &self.context;
        let encoding = self.encoding;
        let span = debug_span!("translate", kind = %self.kind, steps = ctx.steps);
        let _guard = span.enter();

        let mut formula = DimacsFormula::new();

        // 1. Initial state
        let initial: Vec<Clause> = encoding.initial_state().iter().map(|&lit| Clause::unit(lit)).collect();
        emit(&mut formula, "initial state", initial);

        // 2. Dead positions
        emit(&mut formula, "forbidden positions", encoding.forbidden_constraints(ctx));

        // 3. Action selection, witnesses and transitions
        match ctx.policy.action_model {
            ActionModel::Exclusive => {
                emit(&mut formula, "action selection", exclusive::action_selection_constraints(ctx));
                if ctx.policy.reachability {
                    emit(&mut formula, "reachability", reachability::walk_constraints(encoding, ctx));
                }
                emit(&mut formula, "auxiliary definitions", encoding.auxiliary_constraints(ctx));
            }
            ActionModel::Parallel => {
                for d in Direction::ALL {
                    emit(&mut formula, "incompatibilities", parallel::incompatibility_constraints(ctx, d));
                }
                emit(&mut formula, "occupancy", parallel::occupancy_constraints(encoding, ctx, false));
                emit(&mut formula, "look-ahead occupancy", parallel::occupancy_constraints(encoding, ctx, true));

                let witnesses =
                    reachability::witness_constraints(ctx, encoding.balls_in_transit(), formula.counters());
                emit(&mut formula, "witnesses", witnesses);

                emit(&mut formula, "auxiliary definitions", encoding.auxiliary_constraints(ctx));
                emit(&mut formula, "jumps", parallel::jump_constraints(ctx, encoding.balls_in_transit()));
            }
        }

        for d in Direction::ALL {
            emit(&mut formula, "actions", encoding.action_constraints(ctx, d));
        }

        if ctx.is_parallel() {
            emit(&mut formula, "useless jumps", parallel::useless_jump_constraints(encoding, ctx));
        }

        // 4. Frame axioms
        emit(&mut formula, "frame axioms", encoding.frame_constraints(ctx));

        // 5. Invariants
        if ctx.policy.invariants {
            let invariants = encoding.invariant_constraints(ctx, formula.counters());
            emit(&mut formula, "invariants", invariants);
        }

        // 6. Goal
        emit(&mut formula, "goal", encoding.goal_constraints(ctx));

        info!(
            variables = formula.variable_count(),
            clauses = formula.clause_count(),
            "Translation complete"
        );
        formula
    }
}

fn emit(formula: &mut DimacsFormula, stage: &str, clauses: Vec<Clause>) {
    debug!(stage, clauses = clauses.len(), "Adding clause family");
    formula.add_clauses(&clauses);
}

/// Generate a clause family per location in parallel, concatenated in
/// location order
pub(crate) fn for_each_location<F>(ctx: &Context, generate: F) -> Vec<Clause>
where
    F: Fn(usize) -> Vec<Clause> + Sync + Send,
{
    in_order(ctx.locations().par_iter().copied(), generate)
}

/// Generate a clause family per time step in parallel, concatenated in
/// time order
pub(crate) fn for_each_step<F>(steps: Range<usize>, generate: F) -> Vec<Clause>
where
    F: Fn(usize) -> Vec<Clause> + Sync + Send,
{
    in_order(steps.into_par_iter(), generate)
}

fn in_order<I, F>(items: I, generate: F) -> Vec<Clause>
where
    I: IndexedParallelIterator<Item = usize>,
    F: Fn(usize) -> Vec<Clause> + Sync + Send,
{
    let families: Vec<Vec<Clause>> = items.map(generate).collect();
    families.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::parse_board_from_string;
    use crate::sat::{Atom, Fact, Kind};

    fn puzzle(kind: PuzzleKind, content: &str) -> Puzzle {
        let board = parse_board_from_string(content, kind).unwrap();
        Puzzle::from_board(kind, board).unwrap()
    }

    #[test]
    fn test_policy_checked_on_construction() {
        let sokoban = puzzle(PuzzleKind::Sokoban, "#####\n#@$.#\n#####\n");
        assert!(Translator::new(&sokoban, EncodingPolicy::stepwise(), 1).is_err());
        assert!(Translator::new(&sokoban, EncodingPolicy::sequential(), 1).is_ok());
    }

    #[test]
    fn test_initial_state_comes_first() {
        let sokoban = puzzle(PuzzleKind::Sokoban, "#####\n#@$.#\n#####\n");
        let formula = Translator::new(&sokoban, EncodingPolicy::sequential(), 1)
            .unwrap()
            .translate();

        let actor = Atom::at(Kind::Fact(Fact::Actor), 7, 0);
        assert_eq!(formula.variable(&actor), Some(1));
        assert_eq!(formula.clauses()[0], vec![1]);
        assert_eq!(formula.clauses()[1], vec![-2]);
    }

    #[test]
    fn test_translation_is_deterministic() {
        let snowman = puzzle(PuzzleKind::Snowman, "#######\n#q.1.6#\n#'''''#\n#######\n");
        for policy in [EncodingPolicy::stepwise(), EncodingPolicy::sequential(), EncodingPolicy::parallel()] {
            let translator = Translator::new(&snowman, policy, 3).unwrap();
            assert_eq!(translator.translate().to_dimacs_string(), translator.translate().to_dimacs_string());
        }
    }

    #[test]
    fn test_zero_steps() {
        let snowman = puzzle(PuzzleKind::Snowman, "######\n#q.16#\n######\n");
        let formula = Translator::new(&snowman, EncodingPolicy::parallel(), 0)
            .unwrap()
            .translate();

        // Initial facts, occupancy of step 0 and the goal
        assert_eq!(formula.clause_count(), 20 + 4 * 4 + 4 * 4);
        assert!(formula.variables().atoms().all(|(_, atom)| atom.time == 0));
    }

    #[test]
    fn test_step_order_is_kept() {
        let clauses = for_each_step(0..64, |t| {
            vec![Clause::unit(literals::actor(1, t)), Clause::unit(literals::actor(2, t))]
        });
        let times: Vec<usize> = clauses.iter().map(|clause| clause.literals[0].atom.time).collect();
        let expected: Vec<usize> = (0..64).flat_map(|t| [t, t]).collect();
        assert_eq!(times, expected);
    }
}
