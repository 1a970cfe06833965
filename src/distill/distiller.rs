use crate::ClassBucket;
use crate::Classes;
use crate::ClusterArgs;
use crate::Error;
use crate::Prototype;
use crate::TextArgs;
use crate::Worker;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Prototypes of every class that succeeded, plus the reason each other
/// class was skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub prototypes: BTreeMap<String, Prototype>,
    pub failures: BTreeMap<String, String>,
}

impl Report {
    fn merge(&mut self, label: String, result: Result<Prototype, Error>) -> Result<(), Error> {
        match result {
            Ok(prototype) => {
                log::info!("{:<32}{:<32}", label, format!("{} prototypes", prototype.ipc()));
                self.prototypes.insert(label, prototype);
                Ok(())
            }
            Err(e) if e.is_fatal() => {
                log::error!("{:<32}{:<32}", label, e);
                Err(e)
            }
            Err(e) => {
                log::warn!("{:<32}{:<32}", label, e);
                self.failures.insert(label, e.to_string());
                Ok(())
            }
        }
    }
}

/// Runs one [`Worker`] per class bucket.
///
/// Classes never share mutable state, so they may run on the rayon pool;
/// results are merged into the label-keyed [`Report`] afterwards in class
/// order either way. Per-class failures are recorded and the run goes on;
/// fatal errors abort it.
pub struct Distiller<'a> {
    classes: &'a Classes,
    cluster: ClusterArgs,
    text: TextArgs,
    parallel: bool,
}

impl<'a> Distiller<'a> {
    pub fn new(classes: &'a Classes, cluster: ClusterArgs, text: TextArgs) -> Result<Self, Error> {
        cluster.validate()?;
        text.validate()?;
        Ok(Self {
            classes,
            cluster,
            text,
            parallel: false,
        })
    }

    pub fn parallel(self, parallel: bool) -> Self {
        Self { parallel, ..self }
    }

    fn distill(&self, bucket: ClassBucket) -> (String, Result<Prototype, Error>) {
        let label = bucket.label().to_string();
        let result = match self.classes.get(&label) {
            Some(class) => Worker::new(class, &self.cluster, &self.text).distill(bucket),
            None => Err(Error::Desync {
                label: label.clone(),
                detail: "bucket for an unknown class".into(),
            }),
        };
        (label, result)
    }

    pub fn run(&self, buckets: Vec<ClassBucket>) -> Result<Report, Error> {
        log::info!("{:<32}{:<32}", "distilling classes", buckets.len());
        let results = match self.parallel {
            true => buckets
                .into_par_iter()
                .map(|b| self.distill(b))
                .collect::<Vec<_>>(),
            false => buckets
                .into_iter()
                .map(|b| self.distill(b))
                .collect::<Vec<_>>(),
        };
        let mut report = Report::default();
        for (label, result) in results {
            report.merge(label, result)?;
        }
        log::info!(
            "{:<32}{:<32}",
            "classes distilled",
            format!("{} ok, {} skipped", report.prototypes.len(), report.failures.len())
        );
        Ok(report)
    }
}
