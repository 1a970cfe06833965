use crate::Batch;
use crate::ClassBucket;
use crate::Classes;
use crate::ClusterArgs;
use crate::EmbeddingSource;
use crate::Error;
use crate::Sample;
use crate::Spatial;

/// Routes embedded samples into one [`ClassBucket`] per known class.
///
/// The latent dimension is fixed by the first accepted sample and must be
/// reshape-compatible; an incompatible dimension aborts before any
/// clustering happens. Malformed samples are logged and skipped.
pub struct Aggregator<'a> {
    classes: &'a Classes,
    capacity: Option<usize>,
    buckets: Vec<ClassBucket>,
    dimension: Option<usize>,
    skipped: usize,
    capped: usize,
}

impl<'a> Aggregator<'a> {
    pub fn new(classes: &'a Classes, args: &ClusterArgs) -> Self {
        Self {
            classes,
            capacity: args.capacity(),
            buckets: classes.iter().map(|c| ClassBucket::new(c.key())).collect(),
            dimension: None,
            skipped: 0,
            capped: 0,
        }
    }

    /// Drain a whole source into per-class buckets.
    pub fn collect<S: EmbeddingSource>(
        classes: &'a Classes,
        args: &ClusterArgs,
        source: S,
    ) -> Result<Vec<ClassBucket>, Error> {
        let mut aggregator = Self::new(classes, args);
        for batch in source {
            aggregator.absorb(batch)?;
        }
        aggregator.finish()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Admit every sample of a batch. Only fatal errors propagate.
    pub fn absorb(&mut self, batch: Batch) -> Result<(), Error> {
        for entry in batch {
            match entry.and_then(|sample| self.admit(sample)) {
                Ok(()) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    log::warn!("skipping {}", e);
                    self.skipped += 1;
                }
            }
        }
        Ok(())
    }

    fn admit(&mut self, sample: Sample) -> Result<(), Error> {
        let i = self
            .classes
            .position(sample.label())
            .ok_or_else(|| Error::oracle(sample.identifier(), format!("unknown label {}", sample.label())))?;
        if let Some(x) = sample.non_finite() {
            return Err(Error::oracle(
                sample.identifier(),
                format!("non-finite value at {}", x),
            ));
        }
        match self.dimension {
            None => {
                Spatial::side(sample.dimension())?;
                self.dimension = Some(sample.dimension());
            }
            Some(d) if d != sample.dimension() => {
                return Err(Error::oracle(
                    sample.identifier(),
                    format!("dimension {} differs from {}", sample.dimension(), d),
                ));
            }
            Some(_) => {}
        }
        if self.capacity.is_some_and(|cap| self.buckets[i].len() >= cap) {
            self.capped += 1;
            return Ok(());
        }
        self.buckets[i].push(sample);
        Ok(())
    }

    /// Buckets in class order, one per class, possibly empty.
    pub fn finish(self) -> Result<Vec<ClassBucket>, Error> {
        log::info!(
            "{:<32}{:<32}",
            "samples aggregated",
            self.buckets.iter().map(ClassBucket::len).sum::<usize>()
        );
        if self.skipped > 0 {
            log::warn!("{:<32}{:<32}", "samples skipped", self.skipped);
        }
        if self.capped > 0 {
            log::info!("{:<32}{:<32}", "samples over capacity", self.capped);
        }
        self.buckets.iter().try_for_each(ClassBucket::check)?;
        Ok(self.buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Class;

    fn classes() -> Classes {
        ["dingo", "wolf"].into_iter().map(Class::from).collect()
    }

    fn sample(path: &str, label: &str, latent: Vec<f32>) -> Result<Sample, Error> {
        Ok(Sample::new(path, label, "caption", latent))
    }

    #[test]
    fn routes_by_label_and_skips_bad_samples() {
        let classes = classes();
        let batch = vec![
            sample("a", "dingo", vec![0.; 4]),
            sample("b", "wolf", vec![1.; 4]),
            sample("c", "cat", vec![1.; 4]),
            sample("d", "dingo", vec![f32::NAN; 4]),
            sample("e", "dingo", vec![1.; 16]),
            Err(Error::oracle("f", "decoder crashed")),
            sample("g", "dingo", vec![2.; 4]),
        ];
        let mut aggregator = Aggregator::new(&classes, &ClusterArgs::default());
        aggregator.absorb(batch).expect("non-fatal");
        assert_eq!(aggregator.skipped(), 4);
        let buckets = aggregator.finish().expect("finish");
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].label(), "dingo");
        assert_eq!(buckets[0].paths(), &["a".to_string(), "g".to_string()]);
        assert_eq!(buckets[1].paths(), &["b".to_string()]);
    }

    #[test]
    fn incompatible_dimension_fails_fast() {
        let classes = classes();
        let source = vec![vec![sample("a", "dingo", vec![0.; 6])]].into_iter();
        let result = Aggregator::collect(&classes, &ClusterArgs::default(), source);
        assert!(matches!(result, Err(Error::DimensionMismatch { dimension: 6 })));
    }

    #[test]
    fn capacity_keeps_first_arrivals() {
        let classes = classes();
        let args = ClusterArgs {
            ipc: 2,
            km_expand: 1,
            ..ClusterArgs::default()
        };
        let batch = (0..5)
            .map(|i| sample(&format!("{}", i), "dingo", vec![i as f32; 4]))
            .collect();
        let buckets = Aggregator::collect(&classes, &args, vec![batch].into_iter()).expect("ok");
        assert_eq!(buckets[0].len(), 2);
        assert_eq!(buckets[0].paths(), &["0".to_string(), "1".to_string()]);
    }
}
