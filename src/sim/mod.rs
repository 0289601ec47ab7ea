//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (lanes bottom-up by index, entities by insertion)
//! - No rendering or platform dependencies

pub mod collision;
pub mod combo;
pub mod enemy;
pub mod event;
pub mod floor;
pub mod holes;
pub mod player;
pub mod powerup;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use combo::ComboState;
pub use enemy::{Enemy, init_enemies};
pub use event::{GameEvent, Intent, Shake, SoundKind};
pub use floor::{Floor, floor_top, init_floors};
pub use holes::{Hole, HoleGeometry, Segment};
pub use player::{Player, PlayerState};
pub use powerup::{PowerUp, PowerUpKind};
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, tick};
