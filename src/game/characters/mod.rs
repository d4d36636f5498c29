// Character system
//
// The playable character and the commands its input bindings produce.

pub mod character;

// Re-export commonly used types
pub use character::{CharacterCommand, FlintCharacter};
