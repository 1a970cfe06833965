criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        clustering_kmeans_elkan,
        clustering_kmeans_naive,
        clustering_kmeans_fit,
        scoring_local_outlier_factor,
        claiming_cluster_exemplars,
        summarizing_cluster_captions,
}

fn latents(n: usize, dim: usize) -> Vec<Latent> {
    let ref mut rng = SmallRng::seed_from_u64(0);
    (0..n)
        .map(|i| {
            (0..dim)
                .map(|_| 10. * (i % 8) as f32 + rng.random::<f32>())
                .collect::<Vec<_>>()
        })
        .map(Latent::from)
        .collect()
}

fn clustering_kmeans_elkan(c: &mut criterion::Criterion) {
    let km = KMeans::new(latents(1300, 64), 0).seeded(10);
    let mut bounds = km.init_bounds();
    c.bench_function("compute one Elkan k-means step", |b| {
        b.iter(|| km.step_elkan(&mut bounds))
    });
}

fn clustering_kmeans_naive(c: &mut criterion::Criterion) {
    let km = KMeans::new(latents(1300, 64), 0).seeded(10);
    c.bench_function("compute one naive k-means step", |b| {
        b.iter(|| km.step_naive())
    });
}

fn clustering_kmeans_fit(c: &mut criterion::Criterion) {
    let points = latents(1300, 64);
    c.bench_function("fit 10 k-means restarts over a class", |b| {
        b.iter(|| KMeans::new(points.clone(), 0).fit(10))
    });
}

fn scoring_local_outlier_factor(c: &mut criterion::Criterion) {
    let points = latents(1300, 64);
    c.bench_function("score local outlier factors of a class", |b| {
        b.iter(|| LocalOutlierFactor::new(&points, LOF_NEIGHBORS).inliers(0.1))
    });
}

fn claiming_cluster_exemplars(c: &mut criterion::Criterion) {
    let points = latents(1300, 64);
    let centers = latents(50, 64);
    c.bench_function("claim distinct exemplars for 50 clusters", |b| {
        b.iter(|| claims("bench", &centers, &points))
    });
}

fn summarizing_cluster_captions(c: &mut criterion::Criterion) {
    let class = Class::from("n02115641\tdingo, warrigal, warragal, Canis dingo");
    let words = ["wild", "sandy", "forest", "running", "sleeping", "pup", "grass", "alert"];
    let captions = (0..1300)
        .map(|i| {
            format!(
                "a {} dingo {} near the {}",
                words[i % 8],
                words[(i / 8) % 8],
                words[(i / 64) % 8]
            )
        })
        .collect::<Vec<_>>();
    let summarizer = Summarizer::new(&class, &captions, &TextArgs::default());
    c.bench_function("summarize a cluster of captions", |b| {
        b.iter(|| summarizer.summarize(0, &captions[..130]))
    });
}

use protoseed::*;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
