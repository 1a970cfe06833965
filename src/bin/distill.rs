//! Distill Binary
//!
//! Reads precomputed embeddings, distills per-class prototypes and writes
//! the JSON artifacts next to each other under `--save-prototype-path`.

use clap::Parser;
use protoseed::*;
use std::fs::File;
use std::io::BufReader;

fn main() -> anyhow::Result<()> {
    log()?;
    let args = Args::parse();
    let cluster = args.cluster();
    let text = args.text();
    let classes = Classes::load(&args.labels)?;
    log::info!("{:<32}{:<32}", "classes loaded", classes.len());
    let source = JsonlSource::new(BufReader::new(File::open(&args.embeddings)?), args.batch_size);
    let source = match args.captions {
        Some(ref path) => source.with_captions(Captions::load(path)?),
        None => source,
    };
    let distiller = Distiller::new(&classes, cluster.clone(), text.clone())?.parallel(args.parallel);
    let buckets = Aggregator::collect(&classes, &cluster, source)?;
    let report = distiller.run(buckets)?;
    Artifacts::new(&args.save_prototype_path, &args.dataset, &cluster, &text).save(&report)?;
    for (label, reason) in report.failures.iter() {
        log::warn!("{:<32}{:<32}", label, reason);
    }
    Ok(())
}
