//! Reader for the lattice format printed by the CaboCha dependency parser.
//!
//! ```text
//! * 0 2D 0/1 -0.764522
//! 太郎	名詞,固有名詞,人名,名,*,*,太郎,タロウ,タロー
//! は	助詞,係助詞,*,*,*,*,は,ハ,ワ
//! * 1 2D 0/1 -0.764522
//! 花子	名詞,固有名詞,人名,名,*,*,花子,ハナコ,ハナコ
//! に	助詞,格助詞,一般,*,*,*,に,ニ,ニ
//! * 2 -1D 0/0 0.000000
//! あげた	動詞,自立,*,*,五段・ラ行,連用タ接続,あげる,アゲ,アゲ
//! EOS
//! ```
//!
//! Every `*` line opens a chunk and names the chunk it depends on, `-1` marking the root. The
//! label of a chunk is the concatenation of the surface forms of its tokens.

use crate::{Tree, TreeError};
use std::io::BufRead;
use thiserror::Error;

const END_OF_SENTENCE: &str = "EOS";
const CHUNK_PREFIX: &str = "* ";

/// Errors found while reading CaboCha output.
#[derive(Debug, Error)]
pub enum CabochaError {
    /// The underlying reader failed.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// A chunk header lacks its id or its head.
    #[error("line {line}: malformed chunk header")]
    MalformedChunk {
        /// One-based line number.
        line: usize,
    },

    /// A chunk header names a head that is neither `-1` nor a chunk id.
    #[error("line {line}: invalid head")]
    InvalidHead {
        /// One-based line number.
        line: usize,
    },

    /// Chunk ids must count up from zero within each sentence.
    #[error("line {line}: expected chunk {expected}, found {found}")]
    ChunkOutOfOrder {
        /// One-based line number.
        line: usize,
        /// The id the chunk should have had.
        expected: usize,
        /// The id the chunk has.
        found: String,
    },

    /// A token line appears before any chunk header.
    #[error("line {line}: token outside of a chunk")]
    TokenOutsideChunk {
        /// One-based line number.
        line: usize,
    },

    /// A token line lacks the tab that separates the surface form from its features.
    #[error("line {line}: malformed token")]
    MalformedToken {
        /// One-based line number.
        line: usize,
    },

    /// The input ends before the last sentence's `EOS`.
    #[error("input ends inside a sentence")]
    UnterminatedSentence,
}

/// The chunks of a single parsed sentence, as parallel parent and label arrays.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Sentence {
    /// The chunk each chunk depends on, `None` for the root.
    pub parents: Vec<Option<usize>>,

    /// The surface text of each chunk.
    pub labels: Vec<String>,
}

impl Sentence {
    /// Builds the dependency [Tree] of this sentence.
    pub fn to_tree(&self) -> Result<Tree<String>, TreeError> {
        Tree::build(&self.parents, self.labels.clone())
    }

    fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Reads every sentence from CaboCha lattice output.
///
/// Empty lines are ignored.
pub fn parse<R: BufRead>(reader: R) -> Result<Vec<Sentence>, CabochaError> {
    let mut sentences = Vec::new();
    let mut current = Sentence::default();

    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        let n = n + 1;

        if line.is_empty() {
            continue;
        }

        if line == END_OF_SENTENCE {
            sentences.push(std::mem::take(&mut current));
        } else if let Some(header) = line.strip_prefix(CHUNK_PREFIX) {
            let (id, head) = chunk(header, n)?;
            let expected = current.parents.len();
            if id.parse::<usize>().ok() != Some(expected) {
                return Err(CabochaError::ChunkOutOfOrder {
                    line: n,
                    expected,
                    found: id.to_string(),
                });
            }

            current.parents.push(head);
            current.labels.push(String::new());
        } else {
            let (surface, _) = line
                .split_once('\t')
                .ok_or(CabochaError::MalformedToken { line: n })?;

            match current.labels.last_mut() {
                Some(label) => label.push_str(surface),
                None => return Err(CabochaError::TokenOutsideChunk { line: n }),
            }
        }
    }

    if !current.is_empty() {
        return Err(CabochaError::UnterminatedSentence);
    }

    Ok(sentences)
}

/// Splits `<id> <head>D ...` into the chunk id and its parent.
fn chunk(header: &str, line: usize) -> Result<(&str, Option<usize>), CabochaError> {
    let mut fields = header.split_whitespace();
    let (id, link) = match (fields.next(), fields.next()) {
        (Some(id), Some(link)) => (id, link),
        _ => return Err(CabochaError::MalformedChunk { line }),
    };

    let head = link.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    let head = match head.parse::<isize>() {
        Ok(-1) => None,
        Ok(h) => Some(usize::try_from(h).map_err(|_| CabochaError::InvalidHead { line })?),
        Err(_) => return Err(CabochaError::InvalidHead { line }),
    };

    Ok((id, head))
}
