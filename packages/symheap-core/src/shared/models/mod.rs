//! Collaborator value types shared by every feature
//!
//! These are the identifier, expression and type vocabularies the symbolic
//! heap is built over. They are plain immutable values with structural
//! equality and a total order.

pub mod exp;
pub mod ident;
pub mod program;
pub mod typ;

pub use exp::{BinOp, Const, Exp, UnOp};
pub use ident::{Ident, IdentKind};
pub use program::{CallFlags, Location, PredSymbol, Pvar, PvarKind};
pub use typ::{FieldName, Typ};
