// Physics system using rapier2d
//
// The character's capsule collider lives here; the character-movement
// component drives its velocity and queries the world for ground contact.

pub mod body;
mod collision;
mod world;

pub use body::{ColliderHandle, RigidBodyHandle};
pub use collision::CollisionGroups;
pub use world::{HitResult, PhysicsWorld};
