//! Variable management for SAT encoding
//!
//! Atoms are structured values (a kind tag, an optional location and a time
//! step). They are hashed by value and only rendered to text when the formula
//! is written out.

use std::collections::HashMap;
use std::fmt;

use crate::grid::Direction;

/// Boolean state facts of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Fact {
    /// The actor stands on the cell
    Actor,
    /// Snow covers the cell
    Snow,
    Small,
    Medium,
    Large,
    /// Sokoban ball
    Ball,
    /// Sokoban hole (goal square)
    Hole,
}

impl Fact {
    fn tag(self) -> &'static str {
        match self {
            Fact::Actor => "c",
            Fact::Snow => "s",
            Fact::Small => "bs",
            Fact::Medium => "bm",
            Fact::Large => "bl",
            Fact::Ball => "b",
            Fact::Hole => "h",
        }
    }
}

/// Snowball sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl Size {
    pub const ALL: [Size; 3] = [Size::Small, Size::Medium, Size::Large];

    /// The state fact recording a ball of this size
    pub fn fact(self) -> Fact {
        match self {
            Size::Small => Fact::Small,
            Size::Medium => Fact::Medium,
            Size::Large => Fact::Large,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Size::Small => "s",
            Size::Medium => "m",
            Size::Large => "l",
        }
    }
}

/// Directed sub-actions and their auxiliaries, indexed by direction, location and time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    /// The actor left the cell for its neighbour
    MoveActor,
    Move,
    Push,
    PushSmall,
    PushMedium,
    PushBall,
    Roll,
    RollBall,
    RollSmall,
    RollMedium,
    RollLarge,
    Pop,
    PopBall,
    PopSmall,
    PopMedium,
}

impl Step {
    fn tag(self) -> &'static str {
        match self {
            Step::MoveActor => "movec",
            Step::Move => "move",
            Step::Push => "push",
            Step::PushSmall => "push_s",
            Step::PushMedium => "push_m",
            Step::PushBall => "push_ball",
            Step::Roll => "roll",
            Step::RollBall => "roll_ball",
            Step::RollSmall => "roll_s",
            Step::RollMedium => "roll_m",
            Step::RollLarge => "roll_l",
            Step::Pop => "pop",
            Step::PopBall => "pop_ball",
            Step::PopSmall => "pop_s",
            Step::PopMedium => "pop_m",
        }
    }
}

/// Reachability witness families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Witness {
    /// Path followed by the actor between two consecutive steps
    Walk,
    /// Path licensing a jump of the actor
    Jump,
    /// Path licensing the n-th ball action of a step (1-based)
    BallAction(u32),
}

/// Semantic role of an atom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Fact(Fact),
    /// Chosen direction; located in the parallel action model, global otherwise
    Action(Direction),
    Step(Step, Direction),
    Grow(Size),
    Stay(Size),
    Emerge(Size, Direction),
    /// Some ball occupies the cell
    Occupied,
    /// Some ball occupies the cell or is about to roll onto it
    OccupiedAhead,
    MediumOrLarge,
    Path(Witness),
    Target(Witness),
    /// Actor relocation; located or global
    Jump,
    /// Ball action; located or global
    BallAction,
    /// Running-sum auxiliary of a sequential counter
    Counter { id: u32, i: u32, j: u32 },
}

/// A boolean atom of the encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom {
    pub kind: Kind,
    pub loc: Option<usize>,
    pub time: usize,
}

impl Atom {
    /// Atom bound to a location and a time step
    pub fn at(kind: Kind, loc: usize, time: usize) -> Self {
        Self { kind, loc: Some(loc), time }
    }

    /// Atom bound to a time step only
    pub fn global(kind: Kind, time: usize) -> Self {
        Self { kind, loc: None, time }
    }

    pub fn pos(self) -> Lit {
        Lit { atom: self, negated: false }
    }

    pub fn neg(self) -> Lit {
        Lit { atom: self, negated: true }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Kind::Fact(fact) => write!(f, "#{}", fact.tag())?,
            Kind::Action(d) => write!(f, "{}", d.symbol())?,
            Kind::Step(step, d) => write!(f, "{}_{}", step.tag(), d.symbol())?,
            Kind::Grow(size) => write!(f, "grow_{}", size.suffix())?,
            Kind::Stay(size) => write!(f, "stay{}", size.suffix())?,
            Kind::Emerge(size, d) => write!(f, "emerge_{}_{}", size.suffix(), d.symbol())?,
            Kind::Occupied => write!(f, "ball")?,
            Kind::OccupiedAhead => write!(f, "ballbis")?,
            Kind::MediumOrLarge => write!(f, "ball_m_l")?,
            Kind::Path(Witness::Walk) | Kind::Path(Witness::Jump) => write!(f, "p")?,
            Kind::Path(Witness::BallAction(n)) => write!(f, "pbis_{}", n)?,
            Kind::Target(Witness::BallAction(n)) => write!(f, "baction_pos_{}", n)?,
            Kind::Target(_) => write!(f, "jump_pos")?,
            Kind::Jump => write!(f, "jump")?,
            Kind::BallAction => write!(f, "baction")?,
            Kind::Counter { id, i, j } => write!(f, "suma_{}_{}_{}", id, i, j)?,
        }
        if let Some(loc) = self.loc {
            write!(f, "_{}", loc)?;
        }
        write!(f, "_{}", self.time)
    }
}

/// A possibly negated atom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lit {
    pub atom: Atom,
    pub negated: bool,
}

impl std::ops::Not for Lit {
    type Output = Lit;

    fn not(self) -> Lit {
        Lit { atom: self.atom, negated: !self.negated }
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "!")?;
        }
        write!(f, "{}", self.atom)
    }
}

/// Manages SAT variables and their mapping to integers
///
/// Numbers are handed out on first use, starting from 1, so the numbering of a
/// formula only depends on the order in which its clauses were added.
#[derive(Debug, Default)]
pub struct VariableManager {
    /// Map from atom to SAT variable ID (positive integer)
    variable_map: HashMap<Atom, i32>,
    /// Atoms in numbering order; `atoms[id - 1]` has number `id`
    atoms: Vec<Atom>,
}

impl VariableManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the variable ID of an atom
    pub fn get_variable(&mut self, atom: Atom) -> i32 {
        if let Some(&id) = self.variable_map.get(&atom) {
            return id;
        }

        self.atoms.push(atom);
        let id = self.atoms.len() as i32;
        self.variable_map.insert(atom, id);
        id
    }

    /// Signed DIMACS literal for `lit`, numbering its atom if needed
    pub fn literal(&mut self, lit: Lit) -> i32 {
        let id = self.get_variable(lit.atom);
        if lit.negated {
            -id
        } else {
            id
        }
    }

    /// Variable ID of an atom that has already been numbered
    pub fn lookup(&self, atom: &Atom) -> Option<i32> {
        self.variable_map.get(atom).copied()
    }

    /// Atom carrying the given variable ID
    pub fn atom(&self, id: i32) -> Option<&Atom> {
        usize::try_from(id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .and_then(|index| self.atoms.get(index))
    }

    /// Atoms in numbering order
    pub fn atoms(&self) -> impl Iterator<Item = (i32, &Atom)> {
        self.atoms.iter().enumerate().map(|(index, atom)| (index as i32 + 1, atom))
    }

    /// Get the total number of variables created
    pub fn variable_count(&self) -> usize {
        self.atoms.len()
    }

    /// Get statistics about variable usage
    pub fn statistics(&self) -> VariableStatistics {
        let mut stats = VariableStatistics {
            total_variables: self.variable_count(),
            ..Default::default()
        };

        for atom in &self.atoms {
            match atom.kind {
                Kind::Fact(_) => stats.state_variables += 1,
                Kind::Action(_) | Kind::Jump | Kind::BallAction => stats.action_variables += 1,
                Kind::Path(_) | Kind::Target(_) => stats.reachability_variables += 1,
                Kind::Counter { .. } => stats.counter_variables += 1,
                _ => stats.auxiliary_variables += 1,
            }
        }

        stats
    }
}

/// Statistics about variable usage
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct VariableStatistics {
    pub total_variables: usize,
    pub state_variables: usize,
    pub action_variables: usize,
    pub auxiliary_variables: usize,
    pub reachability_variables: usize,
    pub counter_variables: usize,
}

impl fmt::Display for VariableStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Variable Statistics:")?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  State variables: {}", self.state_variables)?;
        writeln!(f, "  Action variables: {}", self.action_variables)?;
        writeln!(f, "  Auxiliary variables: {}", self.auxiliary_variables)?;
        writeln!(f, "  Reachability variables: {}", self.reachability_variables)?;
        writeln!(f, "  Counter variables: {}", self.counter_variables)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_creation() {
        let mut vm = VariableManager::new();

        let var1 = vm.get_variable(Atom::at(Kind::Fact(Fact::Actor), 7, 0));
        let var2 = vm.get_variable(Atom::global(Kind::Action(Direction::East), 0));

        assert_eq!(var1, 1);
        assert_eq!(var2, 2);

        // Same atom, same ID
        let var1_again = vm.get_variable(Atom::at(Kind::Fact(Fact::Actor), 7, 0));
        assert_eq!(var1, var1_again);
        assert_eq!(vm.variable_count(), 2);
    }

    #[test]
    fn test_literal_sign() {
        let mut vm = VariableManager::new();
        let ball = Atom::at(Kind::Fact(Fact::Ball), 8, 1);

        assert_eq!(vm.literal(!ball.pos()), -1);
        assert_eq!(vm.literal(ball.pos()), 1);
        assert_eq!(vm.lookup(&ball), Some(1));
        assert_eq!(vm.atom(1), Some(&ball));
        assert_eq!(vm.atom(0), None);
        assert_eq!(vm.atom(2), None);
    }

    #[test]
    fn test_atom_names() {
        let cases = [
            (Atom::at(Kind::Fact(Fact::Actor), 7, 0), "#c_7_0"),
            (Atom::at(Kind::Fact(Fact::Medium), 12, 3), "#bm_12_3"),
            (Atom::at(Kind::Fact(Fact::Snow), 10, 2), "#s_10_2"),
            (Atom::global(Kind::Action(Direction::North), 2), "n_2"),
            (Atom::at(Kind::Action(Direction::West), 5, 1), "w_5_1"),
            (Atom::at(Kind::Step(Step::PushSmall, Direction::South), 9, 0), "push_s_s_9_0"),
            (Atom::at(Kind::Grow(Size::Medium), 9, 4), "grow_m_9_4"),
            (Atom::at(Kind::Stay(Size::Large), 9, 4), "stayl_9_4"),
            (Atom::at(Kind::Emerge(Size::Medium, Direction::East), 3, 0), "emerge_m_e_3_0"),
            (Atom::at(Kind::MediumOrLarge, 3, 0), "ball_m_l_3_0"),
            (Atom::at(Kind::Path(Witness::Walk), 3, 1), "p_3_1"),
            (Atom::at(Kind::Path(Witness::BallAction(2)), 3, 1), "pbis_2_3_1"),
            (Atom::at(Kind::Target(Witness::Jump), 3, 1), "jump_pos_3_1"),
            (Atom::at(Kind::Target(Witness::BallAction(1)), 3, 1), "baction_pos_1_3_1"),
            (Atom::global(Kind::Jump, 4), "jump_4"),
            (Atom::global(Kind::Counter { id: 3, i: 2, j: 1 }, 5), "suma_3_2_1_5"),
        ];

        for (atom, name) in cases {
            assert_eq!(atom.to_string(), name);
        }
        assert_eq!((!Atom::global(Kind::BallAction, 0).pos()).to_string(), "!baction_0");
    }

    #[test]
    fn test_statistics() {
        let mut vm = VariableManager::new();

        vm.get_variable(Atom::at(Kind::Fact(Fact::Actor), 1, 0));
        vm.get_variable(Atom::global(Kind::Action(Direction::East), 0));
        vm.get_variable(Atom::at(Kind::Path(Witness::Walk), 1, 1));
        vm.get_variable(Atom::global(Kind::Counter { id: 1, i: 1, j: 1 }, 1));
        vm.get_variable(Atom::at(Kind::Occupied, 1, 0));

        let stats = vm.statistics();
        assert_eq!(stats.total_variables, 5);
        assert_eq!(stats.state_variables, 1);
        assert_eq!(stats.action_variables, 1);
        assert_eq!(stats.reachability_variables, 1);
        assert_eq!(stats.counter_variables, 1);
        assert_eq!(stats.auxiliary_variables, 1);
    }
}
