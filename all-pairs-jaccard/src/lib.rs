//! This library provides exact all pairs similarity computation (or *similarity self-join*)
//! on token sets in the Jaccard space.
//! Tokens are interned into dense ids through a [`Vocabulary`], each document becomes a
//! sorted [`TokenSet`], and the [`SimpleJoiner`] evaluates every unordered pair once,
//! optionally on the rayon thread pool.
#![deny(missing_docs)]

pub mod errors;
pub mod simple_join;
pub mod token_set;
pub mod vocab;

pub use errors::Cancelled;
pub use simple_join::SimpleJoiner;
pub use token_set::{TokenSet, EMPTY_UNION_DISTANCE};
pub use vocab::Vocabulary;
