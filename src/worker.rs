//! Distribute independent work items (basis folders) across workers
//!
//! Worker `r` of `N` handles items `r, r + N, r + 2N, ...`.
//! With feature `mpi`, a context can be created from an mpi universe.
#[cfg(feature = "mpi")]
pub use mpi::environment::Universe;
#[cfg(feature = "mpi")]
pub use mpi::initialize;

/// Rank and number of workers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerContext {
    /// Index of this worker
    pub rank: usize,
    /// Total number of workers
    pub world_size: usize,
}

impl Default for WorkerContext {
    fn default() -> Self {
        Self::serial()
    }
}

impl WorkerContext {
    /// New context
    ///
    /// # Panics
    /// `rank` is not smaller than `world_size`
    pub fn new(rank: usize, world_size: usize) -> Self {
        assert!(
            rank < world_size,
            "Rank must be smaller than world size, got rank {} of {}",
            rank,
            world_size
        );
        Self { rank, world_size }
    }

    /// Single worker doing all work
    pub fn serial() -> Self {
        Self {
            rank: 0,
            world_size: 1,
        }
    }

    /// Context of the calling mpi process
    #[cfg(feature = "mpi")]
    #[allow(clippy::cast_sign_loss)]
    pub fn from_universe(universe: &Universe) -> Self {
        use mpi::traits::Communicator;
        let world = universe.world();
        Self::new(world.rank() as usize, world.size() as usize)
    }

    /// Check if this is the first worker
    pub fn is_root(&self) -> bool {
        self.rank == 0
    }

    /// Indices out of `0..n` handled by this worker
    pub fn indices(&self, n: usize) -> impl Iterator<Item = usize> {
        (self.rank..n).step_by(self.world_size)
    }

    /// Items of `items` handled by this worker, with their index
    pub fn partition<'a, T>(&self, items: &'a [T]) -> impl Iterator<Item = (usize, &'a T)> + 'a {
        let (rank, world_size) = (self.rank, self.world_size);
        items.iter().enumerate().skip(rank).step_by(world_size)
    }
}
