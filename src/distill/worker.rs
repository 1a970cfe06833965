use crate::Class;
use crate::ClassBucket;
use crate::ClusterArgs;
use crate::Error;
use crate::Exemplars;
use crate::KMeans;
use crate::Prototype;
use crate::Spatial;
use crate::Summarizer;
use crate::TextArgs;
use crate::caption_key;
use crate::claims;

/// Distills a single class from its own bucket. Holds no state shared
/// with other classes.
pub struct Worker<'a> {
    class: &'a Class,
    cluster: &'a ClusterArgs,
    text: &'a TextArgs,
}

impl<'a> Worker<'a> {
    pub fn new(class: &'a Class, cluster: &'a ClusterArgs, text: &'a TextArgs) -> Self {
        Self {
            class,
            cluster,
            text,
        }
    }

    fn enough(&self, bucket: &ClassBucket) -> Result<(), Error> {
        match bucket.len() < self.cluster.ipc {
            true => Err(Error::InsufficientSamples {
                label: bucket.label().to_string(),
                have: bucket.len(),
                need: self.cluster.ipc,
            }),
            false => Ok(()),
        }
    }

    /// Filter, cluster, select exemplars and summarize. The bucket is
    /// consumed and dropped whole.
    pub fn distill(&self, bucket: ClassBucket) -> Result<Prototype, Error> {
        let ref label = bucket.label().to_string();
        bucket.check()?;
        if let Some(d) = bucket.dimension() {
            Spatial::side(d)?;
        }
        self.enough(&bucket)?;
        let bucket = bucket.filter(self.cluster)?;
        self.enough(&bucket)?;
        log::debug!("{:<32}{:<32}", label, format!("clustering {} samples", bucket.len()));

        let points = bucket.latents();
        let fit = KMeans::new(points.to_vec(), self.cluster.seed).fit(self.cluster.ipc)?;
        let exemplars = Exemplars::new(label, &fit, points)?;
        let claimed = claims(label, fit.centers(), points)?;

        let summarizer = Summarizer::new(self.class, bucket.texts(), self.text);
        let captions = exemplars
            .members()
            .iter()
            .map(|members| gather(bucket.texts(), members))
            .collect::<Vec<_>>();
        let summaries = captions
            .iter()
            .enumerate()
            .map(|(j, c)| summarizer.summarize(j, c))
            .collect::<Result<Vec<_>, _>>()?;

        let image = fit
            .centers()
            .iter()
            .map(|c| Spatial::reshape(c.coords()))
            .collect::<Result<Vec<_>, _>>()?;
        let near = claimed
            .iter()
            .map(|i| Spatial::reshape(points[*i].coords()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Prototype {
            label: label.clone(),
            image,
            near,
            near_paths: gather(bucket.paths(), &claimed),
            texts: summaries.iter().map(|s| s.text().to_string()).collect(),
            text_exemplars: exemplars
                .text(self.text.k_text)
                .iter()
                .map(|top| gather(bucket.texts(), top))
                .collect(),
            image_exemplars: exemplars
                .image(self.text.k_image)
                .iter()
                .map(|top| gather(bucket.paths(), top))
                .collect(),
            keys: exemplars
                .members()
                .iter()
                .map(|members| {
                    members
                        .iter()
                        .map(|i| caption_key(&bucket.paths()[*i]).to_string())
                        .collect()
                })
                .collect(),
            captions,
            saliency: summaries.iter().map(|s| s.salient().to_vec()).collect(),
            paths: bucket.paths().to_vec(),
            latents: points.iter().map(|l| l.coords().to_vec()).collect(),
            assignments: fit.labels().to_vec(),
        })
    }
}

fn gather(xs: &[String], indices: &[usize]) -> Vec<String> {
    indices.iter().map(|i| xs[*i].clone()).collect()
}
