use crate::Error;
use crate::LATENT_CHANNELS;
use serde::Deserialize;
use serde::Serialize;

/// A flat latent viewed as a `[4, N, N]` tensor, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Spatial(Vec<Vec<Vec<f32>>>);

impl Spatial {
    /// Side length N of a `4 * N * N` latent.
    pub fn side(dimension: usize) -> Result<usize, Error> {
        let area = dimension / LATENT_CHANNELS;
        let n = (area as f64).sqrt().round() as usize;
        match n > 0 && LATENT_CHANNELS * n * n == dimension {
            true => Ok(n),
            false => Err(Error::DimensionMismatch { dimension }),
        }
    }

    pub fn reshape(coords: &[f32]) -> Result<Self, Error> {
        let n = Self::side(coords.len())?;
        Ok(Self(
            coords
                .chunks(n * n)
                .map(|channel| channel.chunks(n).map(<[f32]>::to_vec).collect())
                .collect(),
        ))
    }

    /// (channels, height, width)
    pub fn shape(&self) -> (usize, usize, usize) {
        let h = self.0.first().map_or(0, Vec::len);
        let w = self.0.first().and_then(|c| c.first()).map_or(0, Vec::len);
        (self.0.len(), h, w)
    }

    pub fn flatten(&self) -> Vec<f32> {
        self.0.iter().flatten().flatten().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_requires_four_squares() {
        assert_eq!(Spatial::side(4).ok(), Some(1));
        assert_eq!(Spatial::side(4 * 64 * 64).ok(), Some(64));
        assert!(Spatial::side(0).is_err());
        assert!(Spatial::side(8).is_err());
        assert!(Spatial::side(4 * 3 * 3 + 4).is_err());
    }

    #[test]
    fn reshape_is_row_major() {
        let coords = (0..16).map(|x| x as f32).collect::<Vec<_>>();
        let spatial = Spatial::reshape(&coords).expect("16 = 4 * 2 * 2");
        assert_eq!(spatial.shape(), (4, 2, 2));
        assert_eq!(spatial.0[1][0][1], 5.);
        assert_eq!(spatial.0[3][1][0], 14.);
        assert_eq!(spatial.flatten(), coords);
    }

    #[test]
    fn reshape_rejects_bad_dimension() {
        assert!(matches!(
            Spatial::reshape(&[0.; 12]),
            Err(Error::DimensionMismatch { dimension: 12 })
        ));
    }
}
