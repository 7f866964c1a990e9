//! Turning extracted messages into language-model training data.
//!
//! The pipeline is:
//!
//! 1. [`tokenize`] segments every message and appends a `"\n"` token after it
//! 2. [`Vocabulary::build`] keeps tokens seen at least `freq_threshold` times
//! 3. [`BatchSampler`] draws random `(x, y)` windows where `y` is `x` shifted by one
//!
//! # Example
//!
//! ```rust
//! use chatlog::config::ExtractorConfig;
//! use chatlog::parser::parse_str;
//! use chatlog::training::{BatchSampler, CharSegmenter, Vocabulary, tokenize};
//!
//! let messages = parse_str(
//!     "2023-01-01 08:00:00\nalice(1)\nhello\n2023-01-01 08:01:00\nbob(2)\nhey\n",
//!     &ExtractorConfig::default(),
//! )?;
//!
//! let stream = tokenize(&messages, &CharSegmenter);
//! let vocab = Vocabulary::build(&stream, 1);
//! let sampler = BatchSampler::new(vocab.encode(&stream), 4)?;
//!
//! let (x, y) = sampler.sample();
//! assert_eq!(x.len(), 4);
//! assert_eq!(x[1..], y[..3]);
//! # Ok::<(), chatlog::ChatlogError>(())
//! ```

use std::collections::HashMap;
use std::fmt;

use jieba_rs::Jieba;
use rand::Rng;

use crate::Message;
use crate::error::{ChatlogError, Result};

/// Token appended after every message.
pub const MESSAGE_END: &str = "\n";

/// Vocabulary entry standing in for every rare or unseen token.
pub const UNKNOWN: &str = "__unk__";

/// Splits message text into tokens.
pub trait Segmenter {
    /// Returns the tokens of `text` in order.
    fn segment(&self, text: &str) -> Vec<String>;
}

/// One token per Unicode scalar value.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharSegmenter;

impl Segmenter for CharSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        text.chars().map(String::from).collect()
    }
}

/// Dictionary-based word segmentation backed by jieba.
///
/// Extracted message text carries no spaces, so words have to be recovered
/// from the character stream. Runs of Latin letters or digits come out as
/// one token; CJK text is split into dictionary words, with the HMM model
/// guessing words the dictionary lacks.
pub struct WordSegmenter {
    jieba: Jieba,
}

impl WordSegmenter {
    /// Loads the bundled dictionary.
    pub fn new() -> Self {
        Self {
            jieba: Jieba::new(),
        }
    }
}

impl Default for WordSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WordSegmenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordSegmenter").finish_non_exhaustive()
    }
}

impl Segmenter for WordSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        self.jieba
            .cut(text, true)
            .into_iter()
            .map(String::from)
            .collect()
    }
}

/// Tokens of a whole corpus plus how often each one occurs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    /// All tokens in corpus order.
    pub tokens: Vec<String>,
    /// Occurrences per distinct token.
    pub frequencies: HashMap<String, usize>,
}

impl TokenStream {
    /// Number of tokens in the stream.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if the stream holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Occurrences of `token`, zero if unseen.
    pub fn frequency(&self, token: &str) -> usize {
        self.frequencies.get(token).copied().unwrap_or(0)
    }
}

/// Segments every message, following each with a [`MESSAGE_END`] token.
pub fn tokenize(messages: &[Message], segmenter: &dyn Segmenter) -> TokenStream {
    let mut stream = TokenStream::default();
    for msg in messages {
        let tokens = segmenter
            .segment(msg.text())
            .into_iter()
            .chain(std::iter::once(MESSAGE_END.to_string()));
        for token in tokens {
            *stream.frequencies.entry(token.clone()).or_insert(0) += 1;
            stream.tokens.push(token);
        }
    }
    stream
}

/// Bidirectional token/index mapping.
///
/// Index 0 is always [`UNKNOWN`]; the remaining entries are the kept tokens
/// in sorted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    words: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Builds a vocabulary from every token seen at least `freq_threshold` times.
    pub fn build(stream: &TokenStream, freq_threshold: usize) -> Self {
        let mut kept: Vec<&String> = stream
            .frequencies
            .iter()
            .filter(|(word, freq)| **freq >= freq_threshold && word.as_str() != UNKNOWN)
            .map(|(word, _)| word)
            .collect();
        kept.sort();

        let words: Vec<String> = std::iter::once(UNKNOWN.to_string())
            .chain(kept.into_iter().cloned())
            .collect();
        let index = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i))
            .collect();

        Self { words, index }
    }

    /// Number of entries, [`UNKNOWN`] included.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always `false`: the unknown entry is present even for an empty corpus.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Index of `word`, or 0 if it is not in the vocabulary.
    pub fn index_of(&self, word: &str) -> usize {
        self.index.get(word).copied().unwrap_or(0)
    }

    /// Token at `index`.
    pub fn word_of(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    /// Returns `true` if `word` has its own entry.
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Maps every token of the stream to its index.
    pub fn encode(&self, stream: &TokenStream) -> Vec<usize> {
        stream.tokens.iter().map(|t| self.index_of(t)).collect()
    }
}

/// A batch of training pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Batch {
    /// Input windows, each `seg_length` token indices long.
    pub x: Vec<Vec<usize>>,
    /// Target windows: the matching input window shifted by one token.
    pub y: Vec<Vec<usize>>,
}

impl Batch {
    /// Number of pairs in the batch.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns `true` if the batch holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Uniform random sampler of next-token training windows.
#[derive(Debug, Clone)]
pub struct BatchSampler {
    data: Vec<usize>,
    seg_length: usize,
}

impl BatchSampler {
    /// Creates a sampler over encoded tokens.
    ///
    /// # Errors
    ///
    /// [`ChatlogError::InvalidConfig`] if `seg_length` is zero or `data`
    /// holds fewer than `seg_length + 1` tokens.
    pub fn new(data: Vec<usize>, seg_length: usize) -> Result<Self> {
        if seg_length == 0 {
            return Err(ChatlogError::invalid_config(
                "segment length must be positive",
            ));
        }
        if data.len() <= seg_length {
            return Err(ChatlogError::invalid_config(format!(
                "need at least {} tokens for segments of length {}, got {}",
                seg_length + 1,
                seg_length,
                data.len()
            )));
        }
        Ok(Self { data, seg_length })
    }

    /// Window length of each sample.
    pub fn seg_length(&self) -> usize {
        self.seg_length
    }

    /// Draws one `(x, y)` pair with the thread-local generator.
    pub fn sample(&self) -> (Vec<usize>, Vec<usize>) {
        self.sample_with(&mut rand::thread_rng())
    }

    /// Draws one `(x, y)` pair from `rng`.
    pub fn sample_with<R: Rng>(&self, rng: &mut R) -> (Vec<usize>, Vec<usize>) {
        // y ends one past x, so the last valid start leaves seg_length + 1 tokens.
        let start = rng.gen_range(0..=self.data.len() - self.seg_length - 1);
        let x = self.data[start..start + self.seg_length].to_vec();
        let y = self.data[start + 1..=start + self.seg_length].to_vec();
        (x, y)
    }

    /// Draws `batch_size` independent pairs with the thread-local generator.
    pub fn batch(&self, batch_size: usize) -> Batch {
        self.batch_with(&mut rand::thread_rng(), batch_size)
    }

    /// Draws `batch_size` independent pairs from `rng`.
    pub fn batch_with<R: Rng>(&self, rng: &mut R, batch_size: usize) -> Batch {
        let (x, y) = (0..batch_size).map(|_| self.sample_with(rng)).unzip();
        Batch { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserInfo;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn messages(texts: &[&str]) -> Vec<Message> {
        let ts = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        texts
            .iter()
            .map(|t| Message::new(ts, UserInfo::new("alice", "1"), *t))
            .collect()
    }

    #[test]
    fn test_char_segmenter() {
        assert_eq!(CharSegmenter.segment("你好a"), ["你", "好", "a"]);
    }

    #[test]
    fn test_word_segmenter_splits_unspaced_text() {
        let segmenter = WordSegmenter::new();
        let text = "我们中出了一个叛徒";
        let words = segmenter.segment(text);

        assert_eq!(words.concat(), text);
        assert!(words.len() < text.chars().count());
        assert!(words.iter().any(|w| w.chars().count() > 1));
    }

    #[test]
    fn test_word_segmenter_on_extracted_text() {
        let stream = tokenize(&messages(&["今天天气不错"]), &WordSegmenter::new());
        assert_eq!(stream.tokens.last().map(String::as_str), Some(MESSAGE_END));
        assert_eq!(stream.tokens[..stream.len() - 1].concat(), "今天天气不错");
        assert!(stream.len() - 1 < "今天天气不错".chars().count());
    }

    #[test]
    fn test_tokenize_appends_message_end() {
        let stream = tokenize(&messages(&["ab", "a"]), &CharSegmenter);
        assert_eq!(stream.tokens, ["a", "b", "\n", "a", "\n"]);
        assert_eq!(stream.frequency("a"), 2);
        assert_eq!(stream.frequency("\n"), 2);
        assert_eq!(stream.frequency("z"), 0);
    }

    #[test]
    fn test_vocabulary_threshold_and_order() {
        let stream = tokenize(&messages(&["cab", "ca", "c"]), &CharSegmenter);
        let vocab = Vocabulary::build(&stream, 2);

        // c: 3, a: 2, b: 1, \n: 3
        assert_eq!(vocab.word_of(0), Some(UNKNOWN));
        assert_eq!(vocab.len(), 4);
        assert_eq!(vocab.word_of(1), Some("\n"));
        assert_eq!(vocab.word_of(2), Some("a"));
        assert_eq!(vocab.word_of(3), Some("c"));
        assert!(!vocab.contains("b"));
        assert_eq!(vocab.index_of("b"), 0);
        assert_eq!(vocab.index_of("c"), 3);
        assert_eq!(vocab.word_of(99), None);
    }

    #[test]
    fn test_vocabulary_of_empty_stream() {
        let vocab = Vocabulary::build(&TokenStream::default(), 1);
        assert_eq!(vocab.len(), 1);
        assert!(!vocab.is_empty());
    }

    #[test]
    fn test_encode() {
        let stream = tokenize(&messages(&["ab"]), &CharSegmenter);
        let vocab = Vocabulary::build(&stream, 1);
        let encoded = vocab.encode(&stream);
        assert_eq!(encoded.len(), stream.len());
        let decoded: Vec<&str> = encoded.iter().filter_map(|&i| vocab.word_of(i)).collect();
        assert_eq!(decoded, ["a", "b", "\n"]);
    }

    #[test]
    fn test_sampler_rejects_short_data() {
        assert!(BatchSampler::new(vec![1, 2, 3], 3).is_err());
        assert!(BatchSampler::new(vec![1, 2, 3], 0).is_err());
        assert!(BatchSampler::new(vec![1, 2, 3], 2).is_ok());
    }

    #[test]
    fn test_sample_is_shifted_window() {
        let data: Vec<usize> = (0..50).collect();
        let sampler = BatchSampler::new(data, 8).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let (x, y) = sampler.sample_with(&mut rng);
            assert_eq!(x.len(), 8);
            assert_eq!(y.len(), 8);
            for (a, b) in x.iter().zip(&y) {
                assert_eq!(a + 1, *b);
            }
        }
    }

    #[test]
    fn test_sample_covers_both_ends() {
        let sampler = BatchSampler::new(vec![0, 1, 2], 2).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let starts: std::collections::HashSet<usize> =
            (0..100).map(|_| sampler.sample_with(&mut rng).0[0]).collect();
        assert_eq!(starts.len(), 1);
        assert!(starts.contains(&0));

        let sampler = BatchSampler::new(vec![0, 1, 2, 3], 2).unwrap();
        let starts: std::collections::HashSet<usize> =
            (0..100).map(|_| sampler.sample_with(&mut rng).0[0]).collect();
        assert_eq!(starts.len(), 2);
    }

    #[test]
    fn test_batch_size() {
        let sampler = BatchSampler::new((0..20).collect(), 4).unwrap();
        let batch = sampler.batch(5);
        assert_eq!(batch.len(), 5);
        assert_eq!(batch.y.len(), 5);
        assert!(sampler.batch(0).is_empty());
    }
}
