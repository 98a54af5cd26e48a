//! The single level of a serial SDC run.

use crate::quadrature::QuadratureType;
use crate::state::StateFactory;
use crate::sweeper::Sweeper;

/// A sweeper paired with the factory for its state vectors.
pub struct Level<W, F>
where
    W: Sweeper,
    F: StateFactory<State = W::State>,
{
    factory: F,
    sweeper: W,
}

impl<W, F> Level<W, F>
where
    W: Sweeper,
    F: StateFactory<State = W::State>,
{
    /// Create a level.
    pub fn new(factory: F, sweeper: W) -> Self {
        Self { factory, sweeper }
    }

    /// Collocation nodes per step.
    pub fn num_nodes(&self) -> usize {
        self.sweeper.quadrature().num_nodes()
    }

    /// Collocation node family.
    pub fn family(&self) -> QuadratureType {
        self.sweeper.quadrature().family()
    }

    /// State vector factory.
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// The sweeper.
    pub fn sweeper(&self) -> &W {
        &self.sweeper
    }

    /// Mutable access to the sweeper.
    pub fn sweeper_mut(&mut self) -> &mut W {
        &mut self.sweeper
    }
}
