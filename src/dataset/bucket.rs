use crate::ClusterArgs;
use crate::Error;
use crate::Latent;
use crate::LocalOutlierFactor;
use crate::Sample;

/// All samples of one class, stored as parallel arrays.
///
/// Index `i` of `paths`, `texts`, `latents` and `joints` always refers to
/// the same sample. The arrays are private and only ever grow together
/// ([`ClassBucket::push`]) or shrink together ([`ClassBucket::retain`]).
/// A bucket is consumed by filtering and dropped whole once its class
/// has been distilled.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassBucket {
    label: String,
    paths: Vec<String>,
    texts: Vec<String>,
    latents: Vec<Latent>,
    joints: Vec<Option<Vec<f32>>>,
}

impl ClassBucket {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            paths: Vec::new(),
            texts: Vec::new(),
            latents: Vec::new(),
            joints: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
    pub fn len(&self) -> usize {
        self.latents.len()
    }
    pub fn is_empty(&self) -> bool {
        self.latents.is_empty()
    }
    pub fn paths(&self) -> &[String] {
        &self.paths
    }
    pub fn texts(&self) -> &[String] {
        &self.texts
    }
    pub fn latents(&self) -> &[Latent] {
        &self.latents
    }
    pub fn joints(&self) -> &[Option<Vec<f32>>] {
        &self.joints
    }
    pub fn dimension(&self) -> Option<usize> {
        self.latents.first().map(Latent::dimension)
    }

    /// Append one sample to every array at once.
    pub fn push(&mut self, sample: Sample) {
        let (path, text, latent, joint) = sample.into_parts();
        self.paths.push(path);
        self.texts.push(text);
        self.latents.push(Latent::from(latent));
        self.joints.push(joint);
    }

    /// Verify the parallel arrays still line up and every latent shares
    /// the dimension of the first.
    pub fn check(&self) -> Result<(), Error> {
        if let Some(d) = self.dimension() {
            if let Some(x) = self.latents.iter().find(|x| x.dimension() != d) {
                return Err(Error::DimensionMismatch {
                    dimension: x.dimension(),
                });
            }
        }
        let n = self.latents.len();
        if self.paths.len() == n && self.texts.len() == n && self.joints.len() == n {
            Ok(())
        } else {
            Err(Error::Desync {
                label: self.label.clone(),
                detail: format!(
                    "{} paths, {} texts, {} latents, {} joints",
                    self.paths.len(),
                    self.texts.len(),
                    n,
                    self.joints.len()
                ),
            })
        }
    }

    /// Keep exactly the entries whose mask bit is set, preserving order,
    /// in every array.
    pub fn retain(self, mask: &[bool]) -> Result<Self, Error> {
        self.check()?;
        if mask.len() != self.len() {
            return Err(Error::Desync {
                label: self.label,
                detail: format!("mask of {} over {} samples", mask.len(), self.latents.len()),
            });
        }
        fn keep<T>(xs: Vec<T>, mask: &[bool]) -> Vec<T> {
            xs.into_iter()
                .zip(mask.iter())
                .filter(|(_, m)| **m)
                .map(|(x, _)| x)
                .collect()
        }
        let bucket = Self {
            label: self.label,
            paths: keep(self.paths, mask),
            texts: keep(self.texts, mask),
            latents: keep(self.latents, mask),
            joints: keep(self.joints, mask),
        };
        bucket.check()?;
        Ok(bucket)
    }

    /// Drop the `contamination` fraction of least dense samples.
    pub fn filter(self, args: &ClusterArgs) -> Result<Self, Error> {
        if args.contamination == 0. {
            return Ok(self);
        }
        let mask = LocalOutlierFactor::new(&self.latents, args.neighbors).inliers(args.contamination);
        let before = self.len();
        let bucket = self.retain(&mask)?;
        log::debug!(
            "{:<32}{:<32}",
            bucket.label(),
            format!("dropped {} of {} outliers", before - bucket.len(), before)
        );
        Ok(bucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::bucket;

    #[test]
    fn retain_shrinks_every_array_in_order() {
        let b = bucket("dingo", 5, 4);
        let kept = b
            .clone()
            .retain(&[true, false, true, false, true])
            .expect("retain");
        assert_eq!(kept.len(), 3);
        for (k, i) in [0, 2, 4].into_iter().enumerate() {
            assert_eq!(kept.paths()[k], b.paths()[i]);
            assert_eq!(kept.texts()[k], b.texts()[i]);
            assert_eq!(kept.latents()[k], b.latents()[i]);
            assert_eq!(kept.joints()[k], b.joints()[i]);
        }
    }

    #[test]
    fn mixed_dimensions_fail_the_check() {
        let mut b = bucket("dingo", 2, 4);
        b.push(Sample::new("train/dingo/x.jpg", "dingo", "odd", vec![0.; 16]));
        assert!(matches!(
            b.check(),
            Err(Error::DimensionMismatch { dimension: 16 })
        ));
    }

    #[test]
    fn short_mask_is_a_desync() {
        let b = bucket("dingo", 3, 4);
        assert!(matches!(b.retain(&[true]), Err(Error::Desync { .. })));
    }

    #[test]
    fn filtering_hundred_keeps_ninety_aligned() {
        let b = bucket("dingo", 100, 4);
        let args = ClusterArgs {
            contamination: 0.1,
            ..ClusterArgs::default()
        };
        let kept = b.clone().filter(&args).expect("filter");
        assert_eq!(kept.len(), 90);
        assert_eq!(kept.paths().len(), 90);
        assert_eq!(kept.texts().len(), 90);
        assert_eq!(kept.joints().len(), 90);
        let mut cursor = 0;
        for (path, latent) in kept.paths().iter().zip(kept.latents()) {
            let i = b.paths()[cursor..]
                .iter()
                .position(|p| p == path)
                .map(|p| p + cursor)
                .expect("kept path came from the bucket");
            assert_eq!(&b.latents()[i], latent);
            cursor = i + 1;
        }
    }

    #[test]
    fn zero_contamination_is_identity() {
        let b = bucket("dingo", 12, 4);
        let args = ClusterArgs {
            contamination: 0.,
            ..ClusterArgs::default()
        };
        assert_eq!(b.clone().filter(&args).expect("filter"), b);
    }
}
