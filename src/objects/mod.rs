//! Stage objects. Each one owns its load state and a handle to its container
//! node; the [`Scene`](crate::scene::Scene) itself belongs to the stage.

pub mod ambience;
pub mod character;
pub mod terrain;

pub use ambience::{Ambience, AudioCue};
pub use character::{CHARACTER_NODE, Character, CharacterRig};
pub use terrain::{TERRAIN_NODE, Terrain};
