mod particle;
mod quadtree;
mod simulation;

pub use particle::*;
pub use quadtree::*;
pub use simulation::*;

#[cfg(test)]
mod quadtree_tests;
