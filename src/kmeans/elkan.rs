use super::*;
use crate::Energy;
use rayon::prelude::*;

/// Triangle-inequality accelerated k-means (Elkan 2003).
///
/// By carrying upper/lower bounds on point-centroid distances between
/// iterations we skip most distance computations while producing the same
/// assignments as Lloyd's algorithm. `step_naive` is the reference
/// implementation used for verification and benchmarks.
///
/// Parallelism is confined to per-point maps whose results are collected
/// in order. Centroid folds run sequentially in point order, so a fixed
/// input always yields bit-identical centroids.
pub trait Elkan: Sync {
    type P: Absorb + Send + Sync;

    fn points(&self) -> &[Self::P];
    fn kmeans(&self) -> &[Self::P];
    fn distance(&self, a: &Self::P, b: &Self::P) -> Energy;

    fn n(&self) -> usize {
        self.points().len()
    }
    fn k(&self) -> usize {
        self.kmeans().len()
    }
    fn point(&self, i: usize) -> &Self::P {
        &self.points()[i]
    }
    fn kmean(&self, j: usize) -> &Self::P {
        &self.kmeans()[j]
    }

    /// Exact bounds from a full O(k) scan per point.
    fn init_bounds(&self) -> Vec<Bound> {
        (0..self.n())
            .into_par_iter()
            .map(|i| self.neighbor(i))
            .map(|(j, d)| Bound::new(j, self.k(), d))
            .collect()
    }

    /// Nearest centroid and its distance. Ties go to the lower index.
    fn neighbor(&self, i: usize) -> (usize, Energy) {
        let ref x = self.point(i);
        self.kmeans()
            .iter()
            .enumerate()
            .map(|(j, c)| (j, self.distance(c, x)))
            .inspect(|(_, d)| debug_assert!(d.is_finite()))
            .min_by(|(_, d1), (_, d2)| d1.total_cmp(d2))
            .unwrap_or((0, Energy::MAX))
    }

    /// d(c, c') for all centroid pairs.
    fn pairwises(&self) -> Vec<Vec<Energy>> {
        (0..self.k())
            .into_par_iter()
            .map(|i| (0..self.k()).map(|j| self.pairwise(i, j)).collect())
            .collect()
    }

    fn pairwise(&self, i: usize, j: usize) -> Energy {
        if i == j {
            0.
        } else {
            self.distance(self.kmean(i), self.kmean(j))
        }
    }

    /// s(c) = (1/2) min_{c' != c} d(c, c')
    fn midpoints(&self, pairwise: &[Vec<Energy>]) -> Vec<Energy> {
        pairwise
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, d)| d * 0.5)
                    .fold(Energy::MAX, Energy::min)
            })
            .collect()
    }

    /// How far each centroid moved.
    fn drift(&self, news: &[Self::P]) -> Vec<Energy> {
        news.iter()
            .enumerate()
            .map(|(j, new)| self.distance(new, self.kmean(j)))
            .collect()
    }

    /// Refresh a stale upper bound before the triangle inequality checks.
    fn refresh(&self, b: &mut Bound, x: &Self::P) {
        if b.stale() {
            b.refresh(self.distance(x, self.kmean(b.j())));
        }
    }
    /// Check one point-centroid pair and maybe reassign.
    fn rebound(&self, b: &mut Bound, j: usize, pairwise: &[Vec<Energy>], x: &Self::P) {
        if b.has_shifted(pairwise, j) {
            b.witness(self.distance(x, self.kmean(j)), j);
        }
    }

    /// Fold assigned points into fresh centroids, in point order.
    fn centroids(&self, bounds: &[Bound]) -> Vec<Self::P> {
        (0..self.k())
            .map(|j| {
                bounds
                    .iter()
                    .enumerate()
                    .filter(|(_, b)| b.j() == j)
                    .map(|(i, _)| self.point(i))
                    .fold(self.kmean(j).identity(), Self::P::absorb)
            })
            .collect()
    }

    /// One accelerated iteration.
    ///
    /// 1. Update bounds and reassign points against the current centroids
    /// 2. Compute new centroids from the updated assignments
    /// 3. Compute how far each centroid drifted
    /// 4. Loosen bounds by the drift for the next iteration
    fn step_elkan(&self, bounds: &mut [Bound]) -> Vec<Self::P> {
        let pairwise = self.pairwises();
        let midpoints = self.midpoints(&pairwise);
        bounds
            .par_iter_mut()
            .enumerate()
            .filter(|(_, b)| !b.can_exclude(&midpoints))
            .for_each(|(i, b)| {
                self.refresh(b, self.point(i));
                (0..self.k()).for_each(|j| self.rebound(b, j, &pairwise, self.point(i)))
            });
        let kmeans = self.centroids(bounds);
        let drifts = self.drift(&kmeans);
        bounds.par_iter_mut().for_each(|b| b.update(&drifts));
        kmeans
    }

    /// One unaccelerated Lloyd iteration.
    fn step_naive(&self) -> Vec<Self::P> {
        let assignments = (0..self.n())
            .into_par_iter()
            .map(|i| self.neighbor(i).0)
            .collect::<Vec<usize>>();
        (0..self.k())
            .map(|j| {
                assignments
                    .iter()
                    .enumerate()
                    .filter(|(_, a)| **a == j)
                    .map(|(i, _)| self.point(i))
                    .fold(self.kmean(j).identity(), Self::P::absorb)
            })
            .collect()
    }

    /// Root-mean-square distance to the nearest centroid.
    fn rms(&self) -> Energy {
        let squares = (0..self.n())
            .into_par_iter()
            .map(|i| self.neighbor(i).1 as f64)
            .map(|d| d * d)
            .collect::<Vec<f64>>();
        match squares.len() {
            0 => 0.,
            n => (squares.iter().sum::<f64>() / n as f64).sqrt() as Energy,
        }
    }
}
