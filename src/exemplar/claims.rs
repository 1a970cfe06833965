use crate::Energy;
use crate::Error;
use crate::Latent;
use rayon::prelude::*;

/// One distinct source sample per cluster, for one-to-one
/// prototype-to-image mapping.
///
/// Clusters claim in ascending id order. Each walks every point of the
/// class by distance to its centroid (lower index on ties) and takes the
/// first one no earlier cluster has claimed.
pub fn claims(label: &str, centers: &[Latent], points: &[Latent]) -> Result<Vec<usize>, Error> {
    if points.len() < centers.len() {
        return Err(Error::InsufficientSamples {
            label: label.to_string(),
            have: points.len(),
            need: centers.len(),
        });
    }
    let candidates = centers
        .par_iter()
        .map(|center| {
            let mut ranked = points
                .iter()
                .enumerate()
                .map(|(i, p)| (i, p.distance(center)))
                .collect::<Vec<(usize, Energy)>>();
            ranked.sort_by(|(a, da), (b, db)| da.total_cmp(db).then(a.cmp(b)));
            ranked
        })
        .collect::<Vec<_>>();
    let mut claimed = vec![false; points.len()];
    let mut picks = Vec::with_capacity(centers.len());
    for ranked in candidates {
        let pick = ranked
            .into_iter()
            .map(|(i, _)| i)
            .find(|i| !claimed[*i])
            .ok_or_else(|| Error::Desync {
                label: label.to_string(),
                detail: "ran out of unclaimed samples".into(),
            })?;
        claimed[pick] = true;
        picks.push(pick);
    }
    Ok(picks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn latents(xs: &[f32]) -> Vec<Latent> {
        xs.iter().map(|x| Latent::from(vec![*x])).collect()
    }

    #[test]
    fn later_clusters_skip_claimed_samples() {
        let points = latents(&[0., 10., 0.1]);
        let centers = latents(&[0., 0.05, 9.]);
        let picks = claims("dingo", &centers, &points).expect("claims");
        assert_eq!(picks, vec![0, 2, 1]);
    }

    #[test]
    fn picks_are_distinct() {
        let points = latents(&[0., 0., 0., 0.]);
        let centers = latents(&[0., 0., 0., 0.]);
        let picks = claims("dingo", &centers, &points).expect("claims");
        assert_eq!(picks, vec![0, 1, 2, 3]);
        assert_eq!(picks.iter().collect::<BTreeSet<_>>().len(), 4);
    }

    #[test]
    fn more_centers_than_points() {
        let result = claims("dingo", &latents(&[0., 1.]), &latents(&[0.]));
        assert!(matches!(result, Err(Error::InsufficientSamples { .. })));
    }
}
