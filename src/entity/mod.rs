pub mod familiar;
pub mod flags;
pub mod light;
pub mod movement;

pub use familiar::{FamiliarAgent, FamiliarSaveData};
pub use flags::{FlagId, SyncedFlags};
pub use movement::{MoveControl, MoveOperation};
