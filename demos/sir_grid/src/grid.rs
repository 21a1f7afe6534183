//! Periodic square lattice: every cell touches its four orthogonal
//! neighbours, wrapping at the edges.

use ssa_agent::{AgentResult, Population, PopulationSource};
use ssa_core::{AgentId, SimRng};

use crate::models::Compartments;

pub struct Grid {
    pub width:            usize,
    pub height:           usize,
    pub initial_infected: usize,
    /// Seed for placing the initial infections.
    pub seed:             u64,
}

impl Grid {
    fn cell(&self, x: usize, y: usize) -> AgentId {
        AgentId((y * self.width + x) as u32)
    }

    fn neighbours(&self, x: usize, y: usize) -> Vec<AgentId> {
        let (w, h) = (self.width, self.height);
        let me = self.cell(x, y);
        [
            self.cell((x + w - 1) % w, y),
            self.cell((x + 1) % w, y),
            self.cell(x, (y + h - 1) % h),
            self.cell(x, (y + 1) % h),
        ]
        .into_iter()
        .filter(|&n| n != me)
        .collect()
    }
}

impl<C: Compartments> PopulationSource<C> for Grid {
    fn populate(self) -> AgentResult<Population<C>> {
        let n = self.width * self.height;
        let mut states = vec![C::SUSCEPTIBLE; n];

        // Distinct cells; asking for more than `n` infects everyone.
        let mut rng = SimRng::new(self.seed);
        let mut placed = 0;
        while placed < self.initial_infected.min(n) {
            let i = rng.gen_range(0..n);
            if states[i] == C::SUSCEPTIBLE {
                states[i] = C::INFECTED;
                placed += 1;
            }
        }

        let mut contacts = Vec::with_capacity(n);
        for y in 0..self.height {
            for x in 0..self.width {
                contacts.push(self.neighbours(x, y));
            }
        }
        Population::new(states, contacts)
    }
}
