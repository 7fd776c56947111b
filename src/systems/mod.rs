//! ECS Systems for the shooter simulation.
//!
//! Systems contain the game logic that operates on components.
//!
//! ## Tick Order
//!
//! One fixed update runs a single chained schedule. Every system sees the
//! results of the ones before it in the same tick:
//!
//! 1. `intent_system` - player input and AI produce this tick's `MoveIntent`
//! 2. `firing_system` - shoot intents spawn projectiles
//! 3. `movement_system` - gravity, tile collision, player scroll
//! 4. `projectile_system` - projectile flight, terrain and soldier hits
//! 5. `vitals_system` - zero health becomes death
//! 6. `animation_system` - frame advance
//! 7. `cooldown_system` - shooting cooldown countdown
//! 8. `camera_system` - camera follows the player's scroll

pub mod ai;
pub mod animation;
pub mod clock;
pub mod combat;
pub mod intent;
pub mod movement;
pub mod scroll;
pub mod serialization;

pub use ai::*;
pub use animation::*;
pub use clock::*;
pub use combat::*;
pub use intent::*;
pub use movement::*;
pub use scroll::*;
pub use serialization::*;
