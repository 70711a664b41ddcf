//! Shorthand constructors for the literals of the encoders

use crate::grid::Direction;
use crate::sat::{Atom, Fact, Kind, Lit, Size, Step};

pub fn located(kind: Kind, loc: usize, time: usize) -> Lit {
    Atom::at(kind, loc, time).pos()
}

pub fn global(kind: Kind, time: usize) -> Lit {
    Atom::global(kind, time).pos()
}

pub fn fact(fact: Fact, loc: usize, time: usize) -> Lit {
    located(Kind::Fact(fact), loc, time)
}

pub fn actor(loc: usize, time: usize) -> Lit {
    fact(Fact::Actor, loc, time)
}

pub fn snow(loc: usize, time: usize) -> Lit {
    fact(Fact::Snow, loc, time)
}

pub fn ball(size: Size, loc: usize, time: usize) -> Lit {
    fact(size.fact(), loc, time)
}

/// The global direction atom of the exclusive model
pub fn action(d: Direction, time: usize) -> Lit {
    global(Kind::Action(d), time)
}

/// The per-location direction atom of the parallel model
pub fn action_at(d: Direction, loc: usize, time: usize) -> Lit {
    located(Kind::Action(d), loc, time)
}

pub fn step(step: Step, d: Direction, loc: usize, time: usize) -> Lit {
    located(Kind::Step(step, d), loc, time)
}

pub fn occupied(loc: usize, time: usize) -> Lit {
    located(Kind::Occupied, loc, time)
}
