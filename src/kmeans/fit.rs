use super::*;
use crate::Energy;
use crate::Error;
use crate::KMEANS_ITERATIONS;
use crate::KMEANS_RESTARTS;
use crate::KMEANS_TOLERANCE;
use rand::SeedableRng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::SmallRng;
use rayon::prelude::*;

/// Outcome of clustering one class.
#[derive(Debug, Clone, PartialEq)]
pub struct Fit {
    centers: Vec<Latent>,
    labels: Vec<usize>,
    inertia: f64,
}

impl Fit {
    /// One centroid per cluster, indexed by cluster id.
    pub fn centers(&self) -> &[Latent] {
        &self.centers
    }
    /// Cluster id of every input point, in input order.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }
    /// Sum of squared distances to assigned centroids.
    pub fn inertia(&self) -> f64 {
        self.inertia
    }
    pub fn k(&self) -> usize {
        self.centers.len()
    }
    /// Input indices of each cluster, ascending.
    pub fn members(&self) -> Vec<Vec<usize>> {
        let mut members = vec![Vec::new(); self.k()];
        self.labels
            .iter()
            .enumerate()
            .for_each(|(i, j)| members[*j].push(i));
        members
    }
}

/// Seeded Euclidean k-means over the latents of one class.
///
/// Runs [`KMEANS_RESTARTS`] k-means++ initialisations, each seeded from
/// `seed + restart`, and keeps the lowest-inertia fit. The same points in
/// the same order with the same seed always produce the same [`Fit`].
#[derive(Debug, Clone)]
pub struct KMeans {
    seed: u64,
    points: Vec<Latent>,
    kmeans: Vec<Latent>,
}

impl KMeans {
    pub fn new(points: Vec<Latent>, seed: u64) -> Self {
        Self {
            seed,
            points,
            kmeans: Vec::new(),
        }
    }

    /// k-means++ centroids from `seed` alone, before any iteration.
    pub fn seeded(mut self, k: usize) -> Self {
        let ref mut rng = SmallRng::seed_from_u64(self.seed);
        self.kmeans = self.init_kmeans(k, rng);
        self
    }

    /// Best of all restarts with exactly `k` non-empty clusters.
    pub fn fit(mut self, k: usize) -> Result<Fit, Error> {
        if k == 0 || self.points.len() < k {
            return Err(Error::Config(format!(
                "cannot form {} clusters from {} points",
                k,
                self.points.len()
            )));
        }
        let mut best: Option<Fit> = None;
        for restart in 0..KMEANS_RESTARTS {
            let fit = self.restart(k, restart as u64);
            log::trace!("restart {:>3} inertia {:.6}", restart, fit.inertia);
            if best.as_ref().map_or(true, |b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }
        best.ok_or_else(|| Error::Config("no k-means restarts configured".into()))
    }

    fn restart(&mut self, k: usize, restart: u64) -> Fit {
        let ref mut rng = SmallRng::seed_from_u64(self.seed.wrapping_add(restart));
        self.kmeans = self.init_kmeans(k, rng);
        let mut bounds = self.init_bounds();
        for t in 0..KMEANS_ITERATIONS {
            let next = self.step_elkan(&mut bounds);
            let drift = self.drift(&next).into_iter().fold(0., Energy::max);
            self.kmeans = next;
            if self.kmeans.iter().any(Latent::is_empty) {
                log::debug!("healing empty clusters at iteration {}", t);
                let labels = bounds.iter().map(Bound::j).collect::<Vec<_>>();
                let labels = self.heal(labels);
                self.kmeans = self.means(&labels);
                bounds = self.init_bounds();
                continue;
            }
            if drift <= KMEANS_TOLERANCE {
                break;
            }
        }
        let labels = (0..self.n())
            .into_par_iter()
            .map(|i| self.neighbor(i).0)
            .collect::<Vec<_>>();
        let labels = self.heal(labels);
        let centers = self.means(&labels);
        let inertia = labels
            .iter()
            .enumerate()
            .map(|(i, j)| self.points[i].squared(&centers[*j]))
            .sum::<f64>();
        Fit {
            centers,
            labels,
            inertia,
        }
    }

    /// k-means++ seeding: each new centroid is drawn with probability
    /// proportional to the squared distance to its nearest chosen one.
    /// When every remaining weight is zero (duplicates), the lowest
    /// unchosen index is taken instead.
    fn init_kmeans(&self, k: usize, rng: &mut SmallRng) -> Vec<Latent> {
        let n = self.n();
        let mut chosen = vec![false; n];
        let mut potentials = vec![1f64; n];
        let mut kmeans = Vec::with_capacity(k);
        while kmeans.len() < k {
            let i = WeightedIndex::new(potentials.iter())
                .ok()
                .map(|w| w.sample(rng))
                .filter(|i| !chosen[*i])
                .or_else(|| chosen.iter().position(|c| !c))
                .unwrap_or(0);
            let x = self.points[i].clone();
            chosen[i] = true;
            potentials = self
                .points
                .par_iter()
                .map(|p| p.squared(&x))
                .collect::<Vec<f64>>()
                .into_iter()
                .zip(potentials.iter())
                .map(|(d0, d1)| f64::min(d0, *d1))
                .collect();
            potentials[i] = 0.;
            kmeans.push(x);
        }
        kmeans
    }

    /// Give every empty cluster the point farthest from its own centroid,
    /// taken only from clusters that can spare one. Ties go to the lower index.
    fn heal(&self, mut labels: Vec<usize>) -> Vec<usize> {
        let mut sizes = vec![0usize; self.k()];
        labels.iter().for_each(|j| sizes[*j] += 1);
        let distances = labels
            .par_iter()
            .enumerate()
            .map(|(i, j)| self.distance(self.point(i), self.kmean(*j)))
            .collect::<Vec<Energy>>();
        let mut moved = vec![false; labels.len()];
        for j in 0..self.k() {
            if sizes[j] > 0 {
                continue;
            }
            let donor = (0..labels.len())
                .filter(|i| !moved[*i] && sizes[labels[*i]] > 1)
                .fold(None, |best: Option<usize>, i| match best {
                    Some(b) if distances[b] >= distances[i] => Some(b),
                    _ => Some(i),
                });
            if let Some(i) = donor {
                sizes[labels[i]] -= 1;
                sizes[j] += 1;
                labels[i] = j;
                moved[i] = true;
            }
        }
        labels
    }

    /// Member means for a labelling.
    fn means(&self, labels: &[usize]) -> Vec<Latent> {
        (0..self.k())
            .map(|j| {
                labels
                    .iter()
                    .enumerate()
                    .filter(|(_, l)| **l == j)
                    .map(|(i, _)| self.point(i))
                    .fold(self.point(0).identity(), Latent::absorb)
            })
            .collect()
    }
}

impl Elkan for KMeans {
    type P = Latent;

    fn points(&self) -> &[Latent] {
        &self.points
    }
    fn kmeans(&self) -> &[Latent] {
        &self.kmeans
    }
    fn distance(&self, a: &Latent, b: &Latent) -> Energy {
        a.distance(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::blobs;

    #[test]
    fn separates_well_spaced_blobs() {
        let (points, truth) = blobs(3, 20, 8, 7);
        let fit = KMeans::new(points, 0).fit(3).expect("fit");
        assert_eq!(fit.k(), 3);
        assert_eq!(fit.labels().len(), 60);
        for members in fit.members() {
            let first = truth[members[0]];
            assert!(members.iter().all(|i| truth[*i] == first));
        }
    }

    #[test]
    fn same_seed_same_fit() {
        let (points, _) = blobs(4, 25, 16, 11);
        let a = KMeans::new(points.clone(), 42).fit(4).expect("fit");
        let b = KMeans::new(points, 42).fit(4).expect("fit");
        assert_eq!(a, b);
    }

    #[test]
    fn one_point_per_cluster() {
        let points = (0..5)
            .map(|i| Latent::from(vec![i as f32, (i * i) as f32]))
            .collect::<Vec<_>>();
        let fit = KMeans::new(points, 3).fit(5).expect("fit");
        let mut labels = fit.labels().to_vec();
        labels.sort();
        assert_eq!(labels, vec![0, 1, 2, 3, 4]);
        assert_eq!(fit.inertia(), 0.);
    }

    #[test]
    fn duplicates_still_fill_every_cluster() {
        let points = vec![Latent::from(vec![1., 1.]); 4];
        let fit = KMeans::new(points, 0).fit(3).expect("fit");
        assert!(fit.members().iter().all(|m| !m.is_empty()));
        assert_eq!(fit.members().iter().map(Vec::len).sum::<usize>(), 4);
    }

    #[test]
    fn too_few_points() {
        let points = vec![Latent::from(vec![0.]), Latent::from(vec![1.])];
        assert!(KMeans::new(points, 0).fit(3).is_err());
    }

    #[test]
    fn elkan_matches_naive() {
        let (points, _) = blobs(5, 40, 6, 3);
        let mut elkan = KMeans::new(points, 9).seeded(5);
        assert_eq!(elkan.k(), 5);
        let mut naive = elkan.clone();
        let mut bounds = elkan.init_bounds();
        for _ in 0..8 {
            elkan.kmeans = elkan.step_elkan(&mut bounds);
            naive.kmeans = naive.step_naive();
            for (a, b) in elkan.kmeans.iter().zip(naive.kmeans.iter()) {
                assert_eq!(a.mass(), b.mass());
                assert!(a.distance(b) < 1e-4);
            }
        }
    }

    #[test]
    fn rms_never_increases_on_separated_data() {
        let (points, _) = blobs(3, 30, 4, 5);
        let mut km = KMeans::new(points, 1).seeded(3);
        let mut bounds = km.init_bounds();
        let mut rms = vec![km.rms()];
        for _ in 0..6 {
            km.kmeans = km.step_elkan(&mut bounds);
            rms.push(km.rms());
        }
        for w in rms.windows(2) {
            assert!(w[1] <= w[0] + 1e-5, "rms increasing: {} -> {}", w[0], w[1]);
        }
    }
}
