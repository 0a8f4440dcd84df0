use crate::config::TableConfig;
use crate::error::ModelError;
use crate::table::CountTable;
use crate::Hashtable;
use hashbrown::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Table parameters used by [`FrequencyModel::new`].
pub const MODEL_TABLE: TableConfig = TableConfig {
    capacity: 57,
    default_value: 0,
    load_factor: 0.5,
    growth_factor: 2.0,
};

/// Which table type backs the models built by [`identify_source`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// [`Hashtable`] configured with [`MODEL_TABLE`].
    Hashtable,
    /// `hashbrown::HashMap<String, u64>`.
    HashMap,
}

/// One of the two reference texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Source {
    A,
    B,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::A => f.write_str("A"),
            Source::B => f.write_str("B"),
        }
    }
}

/// Outcome of [`identify_source`]. Scores are log probabilities normalized by
/// the length of the unknown text.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attribution {
    pub score_a: f64,
    pub score_b: f64,
    pub likely: Source,
}

/// Order-`k` character model of a text.
///
/// For every character position of the training text the model counts the
/// substring of length `k` and the one of length `k + 1` starting there. Both
/// wrap around to the start of the text when they run past its end.
pub struct FrequencyModel<T = Hashtable> {
    k: usize,
    distinct_chars: usize,
    table: T,
}

impl FrequencyModel<Hashtable> {
    /// Trains a model backed by a [`Hashtable`] configured with
    /// [`MODEL_TABLE`].
    pub fn new(k: usize, text: &str) -> Result<Self, ModelError> {
        Self::with_table(k, text, Hashtable::from_config(MODEL_TABLE)?)
    }
}

impl<T: CountTable> FrequencyModel<T> {
    /// Trains a model into `table`.
    ///
    /// The table must be empty and read absent keys as `0`, otherwise the
    /// counts would be offset and every score skewed.
    pub fn with_table(k: usize, text: &str, mut table: T) -> Result<Self, ModelError> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Err(ModelError::EmptyText);
        }
        if table.size() != 0 {
            return Err(ModelError::TableNotEmpty(table.size()));
        }
        if table.default_value() != 0 {
            return Err(ModelError::NonZeroDefault(table.default_value()));
        }

        let distinct_chars = chars.iter().collect::<HashSet<_>>().len();

        for start in 0..chars.len() {
            for gram in [
                circular_gram(&chars, start, k),
                circular_gram(&chars, start, k + 1),
            ] {
                // Counts start at 1 and only grow, so the default of 0 means absent.
                let count = table.get(&gram);
                table.set(&gram, count + 1);
            }
        }

        Ok(Self {
            k,
            distinct_chars,
            table,
        })
    }

    /// Length `k` of the shorter grams counted by this model.
    pub fn order(&self) -> usize {
        self.k
    }

    /// Number of distinct characters in the training text.
    pub fn distinct_chars(&self) -> usize {
        self.distinct_chars
    }

    /// How often `gram` occurred in the training text, counting wraparound.
    pub fn count(&self, gram: &str) -> u64 {
        self.table.get(gram)
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    /// Log probability of `s` under this model, not normalized by length.
    ///
    /// Each position of `s` contributes `ln((m + 1) / (n + S))`, where `n` and
    /// `m` are the counts of the `k`- and `k + 1`-grams of `s` starting there
    /// and `S` is [`FrequencyModel::distinct_chars`].
    pub fn log_probability(&self, s: &str) -> f64 {
        let chars: Vec<char> = s.chars().collect();
        let alphabet = self.distinct_chars as f64;

        (0..chars.len())
            .map(|start| {
                let n = self.table.get(&circular_gram(&chars, start, self.k)) as f64;
                let m = self.table.get(&circular_gram(&chars, start, self.k + 1)) as f64;
                ((m + 1.0) / (n + alphabet)).ln()
            })
            .sum()
    }
}

fn circular_gram(chars: &[char], start: usize, len: usize) -> String {
    chars.iter().cycle().skip(start).take(len).collect()
}

/// Decides which of two reference texts `unknown` more likely came from,
/// using an order-`k` model of each.
///
/// Ties go to [`Source::B`].
pub fn identify_source(
    text_a: &str,
    text_b: &str,
    unknown: &str,
    k: usize,
    backend: Backend,
) -> Result<Attribution, ModelError> {
    match backend {
        Backend::Hashtable => attribute(text_a, text_b, unknown, k, || {
            Hashtable::from_config(MODEL_TABLE).map_err(ModelError::from)
        }),
        Backend::HashMap => attribute(text_a, text_b, unknown, k, || {
            Ok(HashMap::<String, u64>::new())
        }),
    }
}

fn attribute<T, F>(
    text_a: &str,
    text_b: &str,
    unknown: &str,
    k: usize,
    make_table: F,
) -> Result<Attribution, ModelError>
where
    T: CountTable + Send,
    F: Fn() -> Result<T, ModelError> + Sync,
{
    let unknown_len = unknown.chars().count();
    if unknown_len == 0 {
        return Err(ModelError::EmptyText);
    }

    let train = |text: &str| -> Result<FrequencyModel<T>, ModelError> {
        FrequencyModel::with_table(k, text, make_table()?)
    };

    #[cfg(feature = "rayon")]
    let (model_a, model_b) = rayon::join(|| train(text_a), || train(text_b));
    #[cfg(not(feature = "rayon"))]
    let (model_a, model_b) = (train(text_a), train(text_b));

    let score_a = model_a?.log_probability(unknown) / unknown_len as f64;
    let score_b = model_b?.log_probability(unknown) / unknown_len as f64;
    let likely = if score_a > score_b { Source::A } else { Source::B };

    debug!(score_a, score_b, %likely, k, "attributed unknown text");

    Ok(Attribution {
        score_a,
        score_b,
        likely,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grams_wrap_around() {
        let chars: Vec<char> = "abcd".chars().collect();

        assert_eq!(circular_gram(&chars, 0, 2), "ab");
        assert_eq!(circular_gram(&chars, 3, 2), "da");
        assert_eq!(circular_gram(&chars, 2, 3), "cda");
        assert_eq!(circular_gram(&chars, 1, 0), "");
    }

    #[test]
    fn counts_include_wraparound() {
        let model = FrequencyModel::new(2, "abab").unwrap();

        // ab, ba, ab, ba
        assert_eq!(model.count("ab"), 2);
        assert_eq!(model.count("ba"), 2);
        // aba, bab, aba, bab
        assert_eq!(model.count("aba"), 2);
        assert_eq!(model.count("bab"), 2);
        assert_eq!(model.count("abc"), 0);
        assert_eq!(model.order(), 2);
        assert_eq!(model.distinct_chars(), 2);
        assert_eq!(model.table().len(), 4);
    }

    #[test]
    fn order_zero_counts_the_empty_gram() {
        let model = FrequencyModel::new(0, "aab").unwrap();

        assert_eq!(model.count(""), 3);
        assert_eq!(model.count("a"), 2);
        assert_eq!(model.count("b"), 1);
    }

    #[test]
    fn log_probability_by_hand() {
        let model = FrequencyModel::new(1, "ab").unwrap();

        // a:1 b:1 ab:1 ba:1, two distinct characters.
        let expected = ((1.0 + 1.0) / (1.0 + 2.0f64)).ln() * 2.0;
        assert!((model.log_probability("ab") - expected).abs() < 1e-12);

        // "aa" is unseen; "a" still counts once.
        let unseen = ((0.0 + 1.0) / (1.0 + 2.0f64)).ln() * 2.0;
        assert!((model.log_probability("aa") - unseen).abs() < 1e-12);

        assert_eq!(model.log_probability(""), 0.0);
    }

    #[test]
    fn empty_text_is_rejected() {
        assert!(matches!(
            FrequencyModel::new(2, ""),
            Err(ModelError::EmptyText)
        ));
        assert!(matches!(
            identify_source("abc", "def", "", 2, Backend::Hashtable),
            Err(ModelError::EmptyText)
        ));
    }

    #[test]
    fn table_must_read_absent_as_zero() {
        let table = Hashtable::new(8, 5, 0.5, 2.0).unwrap();

        assert_eq!(
            FrequencyModel::with_table(1, "ab", table).err(),
            Some(ModelError::NonZeroDefault(5))
        );
    }

    #[test]
    fn table_must_start_empty() {
        let mut table = Hashtable::new(8, 0, 0.5, 2.0).unwrap();
        table.set("a", 3);

        assert_eq!(
            FrequencyModel::with_table(1, "ab", table).err(),
            Some(ModelError::TableNotEmpty(1))
        );

        let mut map = HashMap::<String, u64>::new();
        map.insert("a".to_string(), 3);
        assert_eq!(
            FrequencyModel::with_table(1, "ab", map).err(),
            Some(ModelError::TableNotEmpty(1))
        );
    }

    #[test]
    fn cleared_table_is_accepted() {
        let mut table = Hashtable::new(8, 0, 0.5, 2.0).unwrap();
        table.set("a", 3);
        table.delete("a").unwrap();

        let model = FrequencyModel::with_table(1, "ab", table).unwrap();
        assert_eq!(model.count("a"), 1);
        assert_eq!(model.count("zz"), 0);
    }

    #[test]
    fn ties_go_to_b() {
        let attribution = identify_source("abc", "abc", "abcabc", 1, Backend::Hashtable).unwrap();

        assert_eq!(attribution.score_a, attribution.score_b);
        assert_eq!(attribution.likely, Source::B);
    }
}
