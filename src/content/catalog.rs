use anyhow::{Result, bail};
use chrono::{Datelike, NaiveDate};
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

#[derive(Embed)]
#[folder = "assets/"]
struct DataAssets;

pub const LEVEL_COUNT: u8 = 10;

/// Ordinal difficulty tier of the word catalog, 1..=10.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level(u8);

impl Level {
    pub fn new(number: u8) -> Option<Self> {
        (1..=LEVEL_COUNT).contains(&number).then_some(Self(number))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Storage key, e.g. "level3".
    pub fn key(self) -> String {
        format!("level{}", self.0)
    }

    pub fn from_key(key: &str) -> Option<Self> {
        key.strip_prefix("level")
            .and_then(|n| n.parse::<u8>().ok())
            .and_then(Self::new)
    }

    pub fn all() -> impl Iterator<Item = Level> {
        (1..=LEVEL_COUNT).map(Level)
    }
}

/// Grouping key for sentence templates, distinct from `Level`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn all() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
    pub id: u32,
    pub headword: String,
    pub pronunciation: String,
    pub translation: String,
    pub example_sentence: String,
    pub example_pronunciation: String,
    pub example_translation: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceTemplate {
    pub prompts: Vec<String>,
    pub word: String,
    pub pronunciation: String,
    pub sentence: String,
    pub sentence_pronunciation: String,
    pub accepted: Vec<String>,
}

/// Identifies one word across the whole catalog. `id` is stable within
/// its level only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WordId {
    pub level: Level,
    pub id: u32,
}

#[derive(Deserialize)]
struct VocabularyFile {
    levels: Vec<LevelEntry>,
}

#[derive(Deserialize)]
struct LevelEntry {
    level: u8,
    words: Vec<WordRecord>,
}

#[derive(Deserialize)]
struct SentenceFile {
    difficulties: Vec<DifficultyEntry>,
}

#[derive(Deserialize)]
struct DifficultyEntry {
    difficulty: Difficulty,
    templates: Vec<SentenceTemplate>,
}

/// Immutable word catalog and sentence-template bank, deserialized once
/// from the bundled dataset.
pub struct Catalog {
    levels: Vec<(Level, Vec<WordRecord>)>,
    sentences: Vec<(Difficulty, Vec<SentenceTemplate>)>,
}

impl Catalog {
    pub fn load() -> Result<Self> {
        let vocab: VocabularyFile = serde_json::from_str(&asset_str("vocabulary.json")?)?;
        let sentences: SentenceFile = serde_json::from_str(&asset_str("sentences.json")?)?;

        let mut levels = Vec::with_capacity(vocab.levels.len());
        for entry in vocab.levels {
            let Some(level) = Level::new(entry.level) else {
                bail!("vocabulary dataset has out-of-range level {}", entry.level);
            };
            if levels.iter().any(|(l, _)| *l == level) {
                bail!("vocabulary dataset repeats level {}", entry.level);
            }
            levels.push((level, entry.words));
        }
        levels.sort_by_key(|(level, _)| *level);

        let sentences = sentences
            .difficulties
            .into_iter()
            .map(|entry| (entry.difficulty, entry.templates))
            .collect();

        Ok(Self { levels, sentences })
    }

    #[cfg(test)]
    pub(crate) fn from_parts(
        levels: Vec<(Level, Vec<WordRecord>)>,
        sentences: Vec<(Difficulty, Vec<SentenceTemplate>)>,
    ) -> Self {
        Self { levels, sentences }
    }

    pub fn levels(&self) -> impl Iterator<Item = Level> + '_ {
        self.levels.iter().map(|(level, _)| *level)
    }

    /// Words of one level in canonical display order. Empty for a level
    /// absent from the dataset.
    pub fn words(&self, level: Level) -> &[WordRecord] {
        self.levels
            .iter()
            .find(|(l, _)| *l == level)
            .map(|(_, words)| words.as_slice())
            .unwrap_or(&[])
    }

    /// All words, levels concatenated in ascending order.
    pub fn all_words(&self) -> Vec<(Level, &WordRecord)> {
        self.levels
            .iter()
            .flat_map(|(level, words)| words.iter().map(move |w| (*level, w)))
            .collect()
    }

    pub fn word_count(&self) -> usize {
        self.levels.iter().map(|(_, words)| words.len()).sum()
    }

    pub fn templates(&self, difficulty: Difficulty) -> &[SentenceTemplate] {
        self.sentences
            .iter()
            .find(|(d, _)| *d == difficulty)
            .map(|(_, templates)| templates.as_slice())
            .unwrap_or(&[])
    }

    /// Day-of-year rotation through the whole catalog.
    pub fn word_of_the_day(&self, date: NaiveDate) -> Option<(Level, &WordRecord)> {
        let all = self.all_words();
        if all.is_empty() {
            return None;
        }
        Some(all[date.ordinal() as usize % all.len()])
    }
}

fn asset_str(name: &str) -> Result<String> {
    let Some(file) = DataAssets::get(name) else {
        bail!("missing bundled asset: {name}");
    };
    Ok(std::str::from_utf8(file.data.as_ref())?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads_all_levels() {
        let catalog = Catalog::load().unwrap();
        let levels: Vec<u8> = catalog.levels().map(Level::number).collect();
        assert_eq!(levels, (1..=LEVEL_COUNT).collect::<Vec<_>>());
        for level in Level::all() {
            assert!(!catalog.words(level).is_empty());
        }
    }

    #[test]
    fn test_all_words_ascending_level_order() {
        let catalog = Catalog::load().unwrap();
        let all = catalog.all_words();
        assert_eq!(all.len(), catalog.word_count());
        let levels: Vec<u8> = all.iter().map(|(l, _)| l.number()).collect();
        let mut sorted = levels.clone();
        sorted.sort();
        assert_eq!(levels, sorted);
    }

    #[test]
    fn test_every_difficulty_has_templates() {
        let catalog = Catalog::load().unwrap();
        for &difficulty in Difficulty::all() {
            let templates = catalog.templates(difficulty);
            assert!(!templates.is_empty(), "{}", difficulty.as_str());
            for template in templates {
                assert!(!template.prompts.is_empty());
                assert!(!template.accepted.is_empty());
            }
        }
    }

    #[test]
    fn test_level_key_round_trip() {
        for level in Level::all() {
            assert_eq!(Level::from_key(&level.key()), Some(level));
        }
        assert_eq!(Level::from_key("level0"), None);
        assert_eq!(Level::from_key("level11"), None);
        assert_eq!(Level::from_key("bogus"), None);
    }

    #[test]
    fn test_word_of_the_day_stable_within_date() {
        let catalog = Catalog::load().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let (l1, w1) = catalog.word_of_the_day(date).unwrap();
        let (l2, w2) = catalog.word_of_the_day(date).unwrap();
        assert_eq!(l1, l2);
        assert_eq!(w1.headword, w2.headword);

        let next = date.succ_opt().unwrap();
        let (_, w3) = catalog.word_of_the_day(next).unwrap();
        assert_ne!(w1.headword, w3.headword);
    }

    #[test]
    fn test_word_ids_unique_within_level() {
        let catalog = Catalog::load().unwrap();
        for level in catalog.levels() {
            let words = catalog.words(level);
            let mut ids: Vec<u32> = words.iter().map(|w| w.id).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), words.len());
        }
    }
}
