use crate::Salient;
use crate::Spatial;

/// Everything distilled from one class, indexed by cluster id.
///
/// Built once by a [`crate::Worker`] and read-only afterwards. Positional
/// fields (`paths`, `latents`, `assignments`) follow the filtered bucket order.
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub label: String,
    /// centroids as `[4, N, N]` tensors
    pub image: Vec<Spatial>,
    /// claimed nearest exemplar latents, one distinct sample per cluster
    pub near: Vec<Spatial>,
    /// source paths of the claimed exemplars
    pub near_paths: Vec<String>,
    /// representative sentence per cluster, possibly empty
    pub texts: Vec<String>,
    /// captions of the `k_text` nearest members
    pub text_exemplars: Vec<Vec<String>>,
    /// paths of the `k_image` nearest members
    pub image_exemplars: Vec<Vec<String>>,
    /// captions of every member
    pub captions: Vec<Vec<String>>,
    /// caption keys of every member
    pub keys: Vec<Vec<String>>,
    pub saliency: Vec<Vec<Salient>>,
    pub paths: Vec<String>,
    /// inlier latents, flat, aligned with `paths`
    pub latents: Vec<Vec<f32>>,
    pub assignments: Vec<usize>,
}

impl Prototype {
    pub fn ipc(&self) -> usize {
        self.image.len()
    }
    /// Cluster sizes in cluster id order.
    pub fn sizes(&self) -> Vec<usize> {
        self.captions.iter().map(Vec::len).collect()
    }
}
