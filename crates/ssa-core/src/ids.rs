//! Typed indices.
//!
//! `AgentId` indexes a population, `TransitionId` indexes a compiled model's
//! transition list.  Both are `Copy + Ord + Hash` so they work as map keys
//! and sort keys directly.

use std::fmt;

macro_rules! index_id {
    ($(#[$attr:meta])* $name:ident($inner:ty) as $tag:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub $inner);

        impl $name {
            /// Largest representable value.  Never produced by the engine.
            pub const MAX: $name = $name(<$inner>::MAX);

            #[inline(always)]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "#{}"), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.index()
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;

            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

index_id! {
    /// Stable identity of an agent: its index in the population.  Doubles as
    /// the scheduler key, so it must not change while the agent is alive.
    AgentId(u32) as "agent";
}

index_id! {
    /// Position of a transition in its model's declaration order.
    ///
    /// Declaration order fixes the scan order during winner selection, so
    /// the index is stable for the life of the compiled model.
    TransitionId(u16) as "transition";
}
