//! Ranking functions over possible worlds for conditional knowledge bases.

mod conditional;
mod config;
mod error;
mod formula;
mod knowledge_base;
mod literal;
mod misc;
mod ranking;
mod variables;

pub use conditional::Conditional;
pub use config::{Config, Repair};
pub use error::Error;
pub use formula::{Formula, Mask};
pub use knowledge_base::KnowledgeBase;
pub use literal::{Literal, Sign, Term};
pub use ranking::{Rank, Ranking, Satisfying};
pub use variables::Variables;

pub type Variable = usize;
/// A complete truth assignment, bit `v` holding the value of variable `v`.
pub type World = usize;
pub type ConditionalIdx = usize;
