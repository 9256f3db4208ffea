pub mod bus;
pub mod events;

pub use bus::{EventBus, EventSink};
pub use events::{Event, MatchUpdateKind, ParticipantSummary, PlayerSummary, PointsUpdateKind};
