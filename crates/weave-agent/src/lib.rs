//! The social agent: a genome wrapped in identity, goals, bounded social
//! memory and behaviour against the neural web.

pub mod agent;
pub mod goals;
pub mod interaction;
pub mod memory;
pub mod summary;

pub use agent::{DomainPerformance, SocialAgent};
pub use goals::{derive_goals, goal_complementarity, SocialGoal};
pub use interaction::resolve_feedback_kind;
pub use memory::{BoundedLog, InfluenceEntry, MemoryEntry, MEMORY_CAPACITY};
pub use summary::{evaluate_social_performance, get_social_summary, SocialPerformance, SocialSummary};
