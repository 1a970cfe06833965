use crate::Energy;

/// Per-point state carried between Elkan (2003) iterations.
///
/// Holds the assigned centroid c(x), an upper bound u(x) on the distance
/// to it, and lower bounds l(x, c) on the distance to every centroid, so
/// most point-centroid distances never need recomputing.
#[derive(Debug, Clone)]
pub struct Bound {
    /// Index of the assigned centroid, c(x) in the paper.
    j: usize,
    /// Lower bounds l(x, c) for each centroid c.
    lower: Vec<Energy>,
    /// Upper bound u(x) on the distance to the assigned centroid.
    error: Energy,
    stale: bool,
}

impl Bound {
    pub fn new(j: usize, k: usize, upper: Energy) -> Self {
        let mut lower = vec![0.; k];
        lower[j] = upper;
        Self {
            j,
            lower,
            error: upper,
            stale: false,
        }
    }
    pub fn j(&self) -> usize {
        self.j
    }
    pub fn k(&self) -> usize {
        self.lower.len()
    }
    pub fn u(&self) -> Energy {
        self.error
    }
    pub fn stale(&self) -> bool {
        self.stale
    }

    /// Step 3 filter: centroid j must be checked only if
    /// 1. j != c(x)
    /// 2. u(x) > l(x, j)
    /// 3. u(x) > d(c(x), j) / 2
    pub fn has_shifted(&self, pairs: &[Vec<Energy>], j: usize) -> bool {
        self.j() != j && self.u() > self.lower[j] && self.u() > 0.5 * pairs[self.j()][j]
    }

    /// u(x) <= s(c(x)) lets the point skip step 3 entirely.
    pub fn can_exclude(&self, midpoints: &[Energy]) -> bool {
        self.u() <= midpoints[self.j()]
    }

    /// Steps 5 and 6: lowers shrink and the upper grows by centroid drift.
    pub fn update(&mut self, drifts: &[Energy]) {
        self.lower
            .iter_mut()
            .zip(drifts.iter())
            .for_each(|(lower, drift)| *lower = (*lower - drift).max(0.));
        self.error += drifts[self.j()];
        self.stale = true;
    }

    /// Replace the upper bound with an exact distance.
    pub fn refresh(&mut self, distance: Energy) {
        let j = self.j();
        self.lower[j] = distance;
        self.error = distance;
        self.stale = false;
    }

    /// Record an exact distance to centroid j, reassigning if strictly closer.
    pub fn witness(&mut self, distance: Energy, j: usize) {
        self.lower[j] = distance;
        if distance < self.u() {
            self.j = j;
            self.error = distance;
        }
    }
}
