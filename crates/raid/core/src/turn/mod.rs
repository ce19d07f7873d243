//! Turn sequencing for the players and the boss.
//!
//! Players act in join order, each passing through three stages
//! (choose, resolve, end). When the last player finishes, the boss takes one
//! turn and a new round starts from the first player.
pub mod indicator;
pub mod manager;

pub use indicator::{BossBudget, StageProgress, StageView, TurnIndicator, TurnPlayerView};
pub use manager::{
    PLAYER_COLORS, TurnInfo, TurnManager, TurnOrderEntry, TurnPhase, TurnStage, TurnTransition,
};
