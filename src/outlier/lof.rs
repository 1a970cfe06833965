use crate::Energy;
use crate::LOF_EPSILON;
use crate::Latent;
use rayon::prelude::*;

/// Local outlier factor (Breunig et al. 2000) over one class.
///
/// A point's local reachability density is compared with that of its
/// k nearest neighbours; a factor well above 1 means the point sits in a
/// sparser region than its neighbourhood.
pub struct LocalOutlierFactor<'a> {
    points: &'a [Latent],
    k: usize,
}

impl<'a> LocalOutlierFactor<'a> {
    /// The neighbourhood shrinks to `n - 1` for small classes.
    pub fn new(points: &'a [Latent], neighbors: usize) -> Self {
        Self {
            points,
            k: neighbors.min(points.len().saturating_sub(1)),
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// k nearest other points of every point, ascending by distance,
    /// ties broken by lower index.
    fn neighborhoods(&self) -> Vec<Vec<(usize, Energy)>> {
        self.points
            .par_iter()
            .enumerate()
            .map(|(i, x)| {
                let mut near = self
                    .points
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(j, y)| (j, x.distance(y)))
                    .collect::<Vec<_>>();
                near.sort_by(|(a, da), (b, db)| da.total_cmp(db).then(a.cmp(b)));
                near.truncate(self.k);
                near
            })
            .collect()
    }

    /// Outlier factor of every point, in input order.
    pub fn scores(&self) -> Vec<Energy> {
        if self.k == 0 {
            return vec![1.; self.points.len()];
        }
        let neighborhoods = self.neighborhoods();
        let kdistance = neighborhoods
            .iter()
            .map(|near| near.last().map(|(_, d)| *d).unwrap_or(0.))
            .collect::<Vec<Energy>>();
        let density = neighborhoods
            .iter()
            .map(|near| {
                let reach = near
                    .iter()
                    .map(|(o, d)| Energy::max(kdistance[*o], *d))
                    .sum::<Energy>()
                    / near.len() as Energy;
                1. / (reach + LOF_EPSILON)
            })
            .collect::<Vec<Energy>>();
        neighborhoods
            .iter()
            .enumerate()
            .map(|(p, near)| {
                near.iter().map(|(o, _)| density[*o]).sum::<Energy>()
                    / near.len() as Energy
                    / density[p]
            })
            .collect()
    }

    /// Inlier mask that drops the `contamination` fraction with the
    /// highest outlier factor.
    ///
    /// The number dropped is `ceil(contamination * (n - 1))`, the count a
    /// percentile threshold with linear interpolation would cut: 10 of 100
    /// at 0.1. Equal scores are dropped lowest index first.
    pub fn inliers(&self, contamination: f32) -> Vec<bool> {
        let n = self.points.len();
        let mut mask = vec![true; n];
        let drop = outlier_count(n, contamination);
        if drop == 0 || self.k == 0 {
            return mask;
        }
        let scores = self.scores();
        let mut ranked = (0..n).collect::<Vec<usize>>();
        ranked.sort_by(|a, b| scores[*b].total_cmp(&scores[*a]).then(a.cmp(b)));
        ranked.into_iter().take(drop).for_each(|i| mask[i] = false);
        mask
    }
}

/// Number of points flagged at a contamination rate.
pub fn outlier_count(n: usize, contamination: f32) -> usize {
    if n < 2 || contamination <= 0. {
        return 0;
    }
    let exact = contamination as f64 * (n - 1) as f64;
    // f32 rates like 0.1 land a hair above the integer they denote
    ((exact * (1. - 1e-6)).ceil() as usize).min(n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::blobs;

    fn line(xs: &[f32]) -> Vec<Latent> {
        xs.iter().map(|x| Latent::from(vec![*x])).collect()
    }

    #[test]
    fn count_follows_percentile_rounding() {
        assert_eq!(outlier_count(100, 0.1), 10);
        assert_eq!(outlier_count(91, 0.1), 9);
        assert_eq!(outlier_count(12, 0.0), 0);
        assert_eq!(outlier_count(1, 0.5), 0);
        assert_eq!(outlier_count(10, 1.0), 9);
    }

    #[test]
    fn isolated_point_scores_highest() {
        let points = line(&[0., 0.1, 0.2, 0.3, 0.4, 0.5, 9.]);
        let lof = LocalOutlierFactor::new(&points, 3);
        let scores = lof.scores();
        let worst = scores
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i);
        assert_eq!(worst, Some(6));
        assert!(scores[6] > 1.5);
        assert!(scores[2] < 1.5);
    }

    #[test]
    fn drops_exactly_the_contaminated_fraction() {
        let (points, _) = blobs(2, 50, 4, 21);
        let mask = LocalOutlierFactor::new(&points, 10).inliers(0.1);
        assert_eq!(mask.len(), 100);
        assert_eq!(mask.iter().filter(|m| !**m).count(), 10);
    }

    #[test]
    fn zero_contamination_keeps_everything() {
        let (points, _) = blobs(2, 10, 4, 2);
        let mask = LocalOutlierFactor::new(&points, 10).inliers(0.);
        assert!(mask.iter().all(|m| *m));
    }

    #[test]
    fn filtering_is_deterministic() {
        let (points, _) = blobs(3, 20, 8, 13);
        let lof = LocalOutlierFactor::new(&points, 10);
        assert_eq!(lof.inliers(0.2), lof.inliers(0.2));
    }

    #[test]
    fn tiny_classes_shrink_the_neighbourhood() {
        let points = line(&[0., 1.]);
        let lof = LocalOutlierFactor::new(&points, 10);
        assert_eq!(lof.k(), 1);
        assert_eq!(lof.scores().len(), 2);
        let single = line(&[3.]);
        assert_eq!(LocalOutlierFactor::new(&single, 10).inliers(0.5), vec![true]);
    }
}
