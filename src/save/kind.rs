/// One persisted artifact file per kind, each keyed by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Image,
    ImageNear,
    ImagePath,
    Text,
    TextExemplars,
    ImageExemplars,
    AllPath,
    AllLatent,
    AllLabels,
    SamplesPerCluster,
    PathPerCluster,
    Saliency,
    Failures,
}

impl Kind {
    pub const fn all() -> [Self; 13] {
        [
            Self::Image,
            Self::ImageNear,
            Self::ImagePath,
            Self::Text,
            Self::TextExemplars,
            Self::ImageExemplars,
            Self::AllPath,
            Self::AllLatent,
            Self::AllLabels,
            Self::SamplesPerCluster,
            Self::PathPerCluster,
            Self::Saliency,
            Self::Failures,
        ]
    }
    /// file name suffix
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::ImageNear => "image-near",
            Self::ImagePath => "image-path",
            Self::Text => "text",
            Self::TextExemplars => "text-exemplars",
            Self::ImageExemplars => "image-exemplars",
            Self::AllPath => "all-path",
            Self::AllLatent => "all-latent",
            Self::AllLabels => "all-labels",
            Self::SamplesPerCluster => "samples-per-cluster",
            Self::PathPerCluster => "path-per-cluster",
            Self::Saliency => "saliency",
            Self::Failures => "failures",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<&str> for Kind {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::all()
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| format!("unknown artifact kind: {}", s))
    }
}
