//! Card system: definitions, abilities, instances, and registry.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardKind`: Type tag (ship, ground unit, structure, event, ...)
//! - `CardDefinition`: Static card data with typed abilities
//! - `Ability`: Typed ability tag compiled from rules text
//! - `CardInstance`: Battlefield card state (damage, flags, attachments)
//! - `CardRegistry`: Card definition lookup and deck-list loading
//!
//! The built-in discovery cards, generator, tokens and starter deck live
//! in `catalog`.

pub mod ability;
pub mod catalog;
pub mod definition;
pub mod instance;
pub mod registry;

pub use ability::{Ability, AuraTarget};
pub use definition::{CardDefinition, CardId, CardKind, RawCard};
pub use instance::{Attachment, CardInstance};
pub use registry::CardRegistry;
