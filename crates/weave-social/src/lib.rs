//! The social network manager: scheduled rounds over the neural web,
//! social-event generation, community lifecycle tracking and trend
//! accumulation.

pub mod community;
pub mod event;
pub mod manager;
pub mod trends;

pub use community::{evolve_communities, CommunityState};
pub use event::{generate_event, EventKind, SocialEvent, TransientBonus};
pub use manager::{RoundMetricsSnapshot, SocialNetworkManager};
pub use trends::Trends;
