use crate::ClusterArgs;
use crate::Error;
use crate::Kind;
use crate::Report;
use crate::Spatial;
use crate::TextArgs;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::path::Path;
use std::path::PathBuf;

/// The set of JSON files describing one distillation run.
///
/// Every file is named
/// `{dataset}-ipc{ipc}-{threshold}-{tpk}-kmexpand{km_expand}-{kind}.json`
/// and holds a map keyed by label, then by cluster id where applicable,
/// so any two files cross-reference.
#[derive(Debug, Clone)]
pub struct Artifacts {
    dir: PathBuf,
    stem: String,
}

impl Artifacts {
    pub fn new(dir: impl AsRef<Path>, dataset: &str, cluster: &ClusterArgs, text: &TextArgs) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            stem: format!(
                "{}-ipc{}-{}-{}-kmexpand{}",
                dataset, cluster.ipc, text.threshold, text.tpk, cluster.km_expand
            ),
        }
    }

    pub fn path(&self, kind: Kind) -> PathBuf {
        self.dir.join(format!("{}-{}.json", self.stem, kind))
    }

    /// Content of one artifact kind.
    pub fn render(report: &Report, kind: Kind) -> Result<Value, Error> {
        fn by_label<T: Serialize>(
            report: &Report,
            f: impl Fn(&crate::Prototype) -> T,
        ) -> Result<Value, Error> {
            let map = report
                .prototypes
                .iter()
                .map(|(label, p)| (label.as_str(), f(p)))
                .collect::<BTreeMap<_, _>>();
            Ok(serde_json::to_value(map)?)
        }
        fn by_cluster<T: Clone>(xs: &[T]) -> BTreeMap<usize, T> {
            xs.iter().cloned().enumerate().collect()
        }
        match kind {
            Kind::Image => by_label(report, |p| p.image.clone()),
            Kind::ImageNear => by_label(report, |p| p.near.clone()),
            Kind::ImagePath => by_label(report, |p| p.near_paths.clone()),
            Kind::Text => by_label(report, |p| p.texts.clone()),
            Kind::TextExemplars => by_label(report, |p| p.text_exemplars.clone()),
            Kind::ImageExemplars => by_label(report, |p| p.image_exemplars.clone()),
            Kind::AllPath => by_label(report, |p| p.paths.clone()),
            Kind::AllLatent => by_label(report, |p| p.latents.clone()),
            Kind::AllLabels => by_label(report, |p| p.assignments.clone()),
            Kind::SamplesPerCluster => by_label(report, |p| by_cluster(&p.captions)),
            Kind::PathPerCluster => by_label(report, |p| by_cluster(&p.keys)),
            Kind::Saliency => by_label(report, |p| by_cluster(&p.saliency)),
            Kind::Failures => Ok(serde_json::to_value(&report.failures)?),
        }
    }

    /// Write every artifact kind, returning the paths written.
    pub fn save(&self, report: &Report) -> Result<Vec<PathBuf>, Error> {
        std::fs::create_dir_all(&self.dir)?;
        Kind::all()
            .into_iter()
            .map(|kind| {
                let path = self.path(kind);
                let value = Self::render(report, kind)?;
                serde_json::to_writer(BufWriter::new(File::create(&path)?), &value)?;
                log::info!("{:<32}{:<32}", "saved artifact", path.display());
                Ok(path)
            })
            .collect()
    }

    fn load<T: DeserializeOwned>(&self, kind: Kind) -> Result<T, Error> {
        let path = self.path(kind);
        log::info!("{:<32}{:<32}", "loading artifact", path.display());
        Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
    }

    /// Representative sentences per label, in cluster order.
    pub fn load_text(&self) -> Result<BTreeMap<String, Vec<String>>, Error> {
        self.load(Kind::Text)
    }

    /// Centroid tensors per label, in cluster order.
    pub fn load_image(&self) -> Result<BTreeMap<String, Vec<Spatial>>, Error> {
        self.load(Kind::Image)
    }
}
