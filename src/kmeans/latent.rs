use super::Absorb;
use crate::Energy;
use serde::Deserialize;
use serde::Serialize;

/// A point in embedding space, weighted by how many samples it stands for.
///
/// Raw samples carry mass 1. Centroids carry the number of members
/// absorbed into them, so an empty cluster is a latent of mass 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Latent {
    coords: Vec<f32>,
    mass: usize,
}

impl Latent {
    pub fn coords(&self) -> &[f32] {
        &self.coords
    }
    pub fn mass(&self) -> usize {
        self.mass
    }
    pub fn dimension(&self) -> usize {
        self.coords.len()
    }
    pub fn is_empty(&self) -> bool {
        self.mass == 0
    }

    /// Squared Euclidean distance, accumulated in f64.
    pub fn squared(&self, other: &Self) -> f64 {
        debug_assert!(self.dimension() == other.dimension());
        self.coords
            .iter()
            .zip(other.coords.iter())
            .map(|(a, b)| (*a as f64 - *b as f64).powi(2))
            .sum()
    }

    /// Euclidean distance.
    pub fn distance(&self, other: &Self) -> Energy {
        self.squared(other).sqrt() as Energy
    }
}

impl From<Vec<f32>> for Latent {
    fn from(coords: Vec<f32>) -> Self {
        Self { coords, mass: 1 }
    }
}

impl From<Latent> for Vec<f32> {
    fn from(latent: Latent) -> Self {
        latent.coords
    }
}

impl Absorb for Latent {
    fn identity(&self) -> Self {
        Self {
            coords: vec![0.; self.dimension()],
            mass: 0,
        }
    }
    /// incremental weighted mean, exact for any absorption order
    /// up to float rounding
    fn absorb(mut self, other: &Self) -> Self {
        if other.mass == 0 {
            return self;
        }
        let mass = self.mass + other.mass;
        let weight = other.mass as f32 / mass as f32;
        self.coords
            .iter_mut()
            .zip(other.coords.iter())
            .for_each(|(c, x)| *c += (x - *c) * weight);
        self.mass = mass;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folding_points_yields_their_mean() {
        let points = [vec![0., 0.], vec![2., 0.], vec![4., 6.]]
            .into_iter()
            .map(Latent::from)
            .collect::<Vec<_>>();
        let mean = points
            .iter()
            .fold(points[0].identity(), Latent::absorb);
        assert_eq!(mean.mass(), 3);
        assert!((mean.coords()[0] - 2.).abs() < 1e-6);
        assert!((mean.coords()[1] - 2.).abs() < 1e-6);
    }

    #[test]
    fn identity_is_empty_and_neutral() {
        let x = Latent::from(vec![1., -1.]);
        let empty = x.identity();
        assert!(empty.is_empty());
        assert_eq!(x.clone().absorb(&empty), x);
    }

    #[test]
    fn euclidean_distance() {
        let a = Latent::from(vec![0., 0.]);
        let b = Latent::from(vec![3., 4.]);
        assert_eq!(a.distance(&b), 5.);
        assert_eq!(a.squared(&b), 25.);
    }
}
