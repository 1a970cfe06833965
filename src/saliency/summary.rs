use crate::Class;
use crate::CommonWords;
use crate::Error;
use crate::Frequency;
use crate::SALIENCY_DIAGNOSTICS;
use crate::Stopwords;
use crate::TextArgs;
use crate::tokenize;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeSet;
use std::collections::HashMap;

/// A ranked salient word: (word, frequency in cluster, cluster size).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salient(pub String, pub Frequency, pub usize);

impl Salient {
    pub fn word(&self) -> &str {
        &self.0
    }
    pub fn freq(&self) -> Frequency {
        self.1
    }
    pub fn size(&self) -> usize {
        self.2
    }
}

/// The representative sentence of one cluster and the words behind it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    text: String,
    salient: Vec<Salient>,
}

impl Summary {
    /// Empty when no caption contains any salient word.
    pub fn text(&self) -> &str {
        &self.text
    }
    pub fn salient(&self) -> &[Salient] {
        &self.salient
    }
}

/// Picks one caption per cluster of a class.
///
/// Built once per class: the exclusion set (stop-words, the class's own
/// name words, and class-wide common words) is the same for every cluster.
pub struct Summarizer<'a> {
    label: &'a str,
    stopwords: &'static Stopwords,
    names: BTreeSet<String>,
    common: CommonWords,
    tpk: usize,
}

impl<'a> Summarizer<'a> {
    /// `captions` are every inlier caption of the class.
    pub fn new<S: AsRef<str>>(class: &'a Class, captions: &[S], args: &TextArgs) -> Self {
        let common = CommonWords::new(captions, args.threshold);
        log::debug!("{:<32}{:<32}", class.key(), format!("{} common words", common.len()));
        Self {
            label: class.key(),
            stopwords: Stopwords::english(),
            names: class.words(),
            common,
            tpk: args.tpk,
        }
    }

    pub fn common(&self) -> &CommonWords {
        &self.common
    }

    fn excluded(&self, word: &str) -> bool {
        self.stopwords.contains(word) || self.names.contains(word) || self.common.contains(word)
    }

    /// Salient words of a cluster, most frequent first. Equal counts keep
    /// the order in which words first appear.
    pub fn rank<S: AsRef<str>>(&self, captions: &[S]) -> Vec<Salient> {
        let mut order = Vec::<(String, Frequency)>::new();
        let mut index = HashMap::<String, usize>::new();
        for word in captions.iter().flat_map(|c| tokenize(c.as_ref())) {
            if self.excluded(&word) {
                continue;
            }
            match index.get(&word) {
                Some(&i) => order[i].1 += 1,
                None => {
                    index.insert(word.clone(), order.len());
                    order.push((word, 1));
                }
            }
        }
        order.sort_by(|(_, a), (_, b)| b.cmp(a));
        order
            .into_iter()
            .map(|(word, freq)| Salient(word, freq, captions.len()))
            .collect()
    }

    /// Summarize one cluster from its members' captions.
    pub fn summarize<S: AsRef<str>>(&self, cluster: usize, captions: &[S]) -> Result<Summary, Error> {
        if captions.is_empty() {
            return Err(Error::EmptyCluster {
                label: self.label.to_string(),
                cluster,
            });
        }
        let ranked = self.rank(captions);
        let text = represent(&ranked[..ranked.len().min(self.tpk)], captions);
        if text.is_empty() {
            log::debug!("{:<32}{:<32}", self.label, format!("cluster {} has no salient caption", cluster));
        }
        Ok(Summary {
            text,
            salient: ranked.into_iter().take(SALIENCY_DIAGNOSTICS).collect(),
        })
    }
}

/// The caption with the strictly highest sum of frequencies of the top
/// words it literally contains. Matching is case-sensitive against the raw
/// caption. First caption wins ties; all-zero yields "".
fn represent<S: AsRef<str>>(top: &[Salient], captions: &[S]) -> String {
    let mut best = (0, String::new());
    for caption in captions.iter().map(AsRef::as_ref) {
        let score = top
            .iter()
            .filter(|s| caption.contains(s.word()))
            .map(Salient::freq)
            .sum::<Frequency>();
        if score > best.0 {
            best = (score, caption.to_string());
        }
    }
    best.1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dingo() -> Class {
        Class::from("n02115641\tdingo, warrigal, warragal, Canis dingo")
    }

    fn args(tpk: usize) -> TextArgs {
        TextArgs {
            tpk,
            ..TextArgs::default()
        }
    }

    #[test]
    fn picks_caption_with_top_words() {
        let class = dingo();
        let captions = [
            "a wild dingo runs in grass",
            "dingo standing alert",
            "a dingo pup sleeping",
        ];
        let summarizer = Summarizer::new(&class, &captions, &args(2));
        let summary = summarizer.summarize(0, &captions).expect("members");
        assert_eq!(summary.text(), "a wild dingo runs in grass");
        assert_eq!(summary.salient()[0], Salient("wild".into(), 1, 3));
        assert!(summary.salient().iter().all(|s| s.word() != "dingo"));
    }

    #[test]
    fn frequency_beats_order() {
        let class = dingo();
        let all = [
            "dingo near a fence",
            "dingo sleeping on sand",
            "dingo on sand dunes",
            "dingo pup sleeping on sand",
            "a red fox",
            "a grey wolf",
            "a white cat",
        ];
        let summarizer = Summarizer::new(&class, &all, &args(2));
        let summary = summarizer.summarize(1, &all[..4]).expect("members");
        assert_eq!(summary.salient()[0].word(), "sand");
        assert_eq!(summary.salient()[1].word(), "sleeping");
        assert_eq!(summary.text(), "dingo sleeping on sand");
    }

    #[test]
    fn common_words_are_never_salient() {
        let class = dingo();
        let all = [
            "dog in grass",
            "dog on grass",
            "dog by grass",
            "dog near water",
            "cat near water",
        ];
        let summarizer = Summarizer::new(&class, &all, &args(20));
        assert!(summarizer.common().contains("dog"));
        for captions in [&all[..2], &all[2..]] {
            let summary = summarizer.summarize(0, captions).expect("members");
            assert!(summary.salient().iter().all(|s| s.word() != "dog"));
        }
    }

    #[test]
    fn zero_score_is_empty() {
        let class = dingo();
        let captions = ["a dingo", "the dingo"];
        let summarizer = Summarizer::new(&class, &captions, &args(5));
        let summary = summarizer.summarize(0, &captions).expect("members");
        assert!(summary.salient().is_empty());
        assert_eq!(summary.text(), "");
    }

    #[test]
    fn first_caption_wins_ties() {
        let class = dingo();
        let all = ["brown fur", "fur brown", "brown coat", "grey wolf", "red fox"];
        let summarizer = Summarizer::new(&class, &all, &args(1));
        let summary = summarizer.summarize(0, &all[..3]).expect("members");
        assert_eq!(summary.salient()[0], Salient("brown".into(), 3, 3));
        assert_eq!(summary.text(), "brown fur");
    }

    #[test]
    fn matching_is_case_sensitive() {
        let class = dingo();
        let all = [
            "Sand everywhere around",
            "dingo on sand",
            "a red fox",
            "a grey wolf",
            "a white cat",
        ];
        let summarizer = Summarizer::new(&class, &all, &args(1));
        let summary = summarizer.summarize(0, &all[..2]).expect("members");
        assert_eq!(summary.salient()[0], Salient("sand".into(), 2, 2));
        assert_eq!(summary.text(), "dingo on sand");
    }

    #[test]
    fn diagnostics_outlast_tpk() {
        let class = dingo();
        let all = [
            "dingo on sand near water",
            "dingo sleeping on sand",
            "a red fox",
            "a grey wolf",
            "a white cat",
        ];
        let summarizer = Summarizer::new(&class, &all, &args(1));
        let summary = summarizer.summarize(0, &all[..2]).expect("members");
        assert_eq!(summary.salient().len(), 4);
        assert_eq!(summary.salient()[0].word(), "sand");
        assert!(summary.salient().len() <= SALIENCY_DIAGNOSTICS);
    }

    #[test]
    fn empty_cluster_is_an_error() {
        let class = dingo();
        let summarizer = Summarizer::new(&class, &["dingo"], &args(2));
        let result = summarizer.summarize(4, &[] as &[&str]);
        assert!(matches!(result, Err(Error::EmptyCluster { cluster: 4, .. })));
    }
}
