//! versedb-context
//!
//! Passage selection for generation: anchor lookup, candidate retrieval,
//! reranking, anchor de-duplication and capping.
#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod selector;

pub use selector::{select_passages, AssembleRequest, Collaborators, PassageSelector};
