use rand::rngs::SmallRng;

use crate::content::{Catalog, Difficulty, Level, SentenceTemplate, WordRecord};
use crate::error::CoreError;
use crate::random;

/// Content slice a session draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Level(Level),
    AllLevels,
    Difficulty(Difficulty),
}

#[derive(Clone, Debug)]
pub enum PoolItem {
    Word { level: Level, word: WordRecord },
    Sentence { difficulty: Difficulty, template: SentenceTemplate },
}

impl PoolItem {
    pub fn word(&self) -> Option<(Level, &WordRecord)> {
        match self {
            PoolItem::Word { level, word } => Some((*level, word)),
            PoolItem::Sentence { .. } => None,
        }
    }

    pub fn template(&self) -> Option<(Difficulty, &SentenceTemplate)> {
        match self {
            PoolItem::Word { .. } => None,
            PoolItem::Sentence { difficulty, template } => Some((*difficulty, template)),
        }
    }
}

/// Items selected for one session plus the traversal order, a permutation
/// of `0..items.len()` generated once at session start.
#[derive(Clone, Debug)]
pub struct QuestionPool {
    pub items: Vec<PoolItem>,
    pub order: Vec<usize>,
}

impl QuestionPool {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item presented at the given traversal position.
    pub fn item_at(&self, position: usize) -> &PoolItem {
        &self.items[self.order[position]]
    }
}

/// Resolve a scope against the catalog and shuffle a traversal order over
/// it. Items keep catalog order; only `order` is randomized.
pub fn build_pool(
    catalog: &Catalog,
    scope: Scope,
    rng: &mut SmallRng,
) -> Result<QuestionPool, CoreError> {
    let items: Vec<PoolItem> = match scope {
        Scope::Level(level) => catalog
            .words(level)
            .iter()
            .cloned()
            .map(|word| PoolItem::Word { level, word })
            .collect(),
        Scope::AllLevels => catalog
            .all_words()
            .into_iter()
            .map(|(level, word)| PoolItem::Word {
                level,
                word: word.clone(),
            })
            .collect(),
        Scope::Difficulty(difficulty) => catalog
            .templates(difficulty)
            .iter()
            .cloned()
            .map(|template| PoolItem::Sentence {
                difficulty,
                template,
            })
            .collect(),
    };

    if items.is_empty() {
        return Err(CoreError::EmptyPool);
    }

    let mut order: Vec<usize> = (0..items.len()).collect();
    random::shuffle(&mut order, rng);
    Ok(QuestionPool { items, order })
}
