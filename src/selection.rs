//! Wave selection in chunk units.

/// The region of a recorded wave that grains are drawn from.
///
/// Invariants: `1 <= size` and `start + size <= num_chunks`.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    start: usize,
    size: usize,
    num_chunks: usize,
    particle_spread: f64,
}

impl Selection {
    pub fn new(num_chunks: usize) -> Self {
        let num_chunks = num_chunks.max(1);
        Self {
            start: 0,
            size: 1,
            num_chunks,
            particle_spread: 1.0,
        }
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn num_chunks(&self) -> usize {
        self.num_chunks
    }

    /// Last chunk covered by the selection.
    pub fn end(&self) -> usize {
        self.start + self.size - 1
    }

    /// Moving the start shrinks the size if the selection would run past the
    /// end of the wave.
    pub fn set_start(&mut self, start: usize) {
        self.start = start.min(self.num_chunks - 1);
        self.size = self.size.min(self.num_chunks - self.start);
    }

    pub fn set_size(&mut self, size: usize) {
        self.size = size.clamp(1, self.num_chunks - self.start);
    }

    /// Visual spread of the grain particles; mirrors the grain duration.
    pub fn particle_spread(&self) -> f64 {
        self.particle_spread
    }

    pub fn set_particle_spread(&mut self, spread: f64) {
        self.particle_spread = spread;
    }
}
