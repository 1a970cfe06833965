use crate::Energy;
use crate::Error;
use crate::Fit;
use crate::Latent;
use rayon::prelude::*;

/// Members of one cluster ranked by distance to its centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    id: usize,
    members: Vec<usize>,
    ranked: Vec<(usize, Energy)>,
}

impl Cluster {
    fn new(id: usize, members: Vec<usize>, center: &Latent, points: &[Latent]) -> Self {
        let mut ranked = members
            .iter()
            .map(|i| (*i, points[*i].distance(center)))
            .collect::<Vec<_>>();
        ranked.sort_by(|(a, da), (b, db)| da.total_cmp(db).then(a.cmp(b)));
        Self {
            id,
            members,
            ranked,
        }
    }
    pub fn id(&self) -> usize {
        self.id
    }
    pub fn len(&self) -> usize {
        self.members.len()
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
    /// Every member, ascending by index.
    pub fn members(&self) -> &[usize] {
        &self.members
    }
    /// Member closest to the centroid; lower index on ties.
    pub fn nearest(&self) -> usize {
        self.ranked[0].0
    }
    /// Up to `k` closest members, nearest first.
    pub fn nearest_k(&self, k: usize) -> Vec<usize> {
        self.ranked.iter().take(k).map(|(i, _)| *i).collect()
    }
    pub fn distances(&self) -> &[(usize, Energy)] {
        &self.ranked
    }
}

/// Exemplar views over every cluster of one class.
///
/// Built from a [`Fit`] over the filtered class; every returned index is a
/// position in the filtered bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Exemplars {
    clusters: Vec<Cluster>,
}

impl Exemplars {
    pub fn new(label: &str, fit: &Fit, points: &[Latent]) -> Result<Self, Error> {
        if fit.labels().len() != points.len() {
            return Err(Error::Desync {
                label: label.to_string(),
                detail: format!(
                    "{} cluster labels for {} latents",
                    fit.labels().len(),
                    points.len()
                ),
            });
        }
        let clusters = fit
            .members()
            .into_par_iter()
            .enumerate()
            .map(|(j, members)| Cluster::new(j, members, &fit.centers()[j], points))
            .collect::<Vec<_>>();
        if let Some(empty) = clusters.iter().find(|c| c.is_empty()) {
            return Err(Error::EmptyCluster {
                label: label.to_string(),
                cluster: empty.id(),
            });
        }
        Ok(Self { clusters })
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }
    pub fn nearest(&self) -> Vec<usize> {
        self.clusters.iter().map(Cluster::nearest).collect()
    }
    /// Closest `k_text` members per cluster, for caption use.
    pub fn text(&self, k_text: usize) -> Vec<Vec<usize>> {
        self.clusters.iter().map(|c| c.nearest_k(k_text)).collect()
    }
    /// Closest `k_image` members per cluster, for image use.
    pub fn image(&self, k_image: usize) -> Vec<Vec<usize>> {
        self.clusters.iter().map(|c| c.nearest_k(k_image)).collect()
    }
    pub fn members(&self) -> Vec<&[usize]> {
        self.clusters.iter().map(Cluster::members).collect()
    }
}
