//! Core library for SuzEd, a save editor for the game Suzerain.
//! Provides the codec for the `Variable={...};` table embedded in the save's
//! `variables` field, plus JSON parsing/serialization for the surrounding
//! document with round-trip guarantees.

mod gui;
mod save;
pub mod statics;
mod value;
pub mod vars;

pub use gui::run_gui;
pub use save::LoadedSave;
pub use value::SzValue;
pub use vars::{VarTable, VarValue, VarsError};
