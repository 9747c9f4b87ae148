//! PDF assembly from staged pages.
//!
//! | Piece | Role |
//! |---|---|
//! | [`backend`] | [`PdfBackend`] trait, [`Strategy`], [`AssemblyError`] |
//! | [`direct`] | Primary: JPEG streams embedded verbatim (`lopdf`) |
//! | [`composed`] | Fallback: decode → RGB → compose (`printpdf`) |
//! | [`assemble`] | [`Assembler`]: picks the strategy, writes the artifact atomically |

pub mod assemble;
pub mod backend;
pub mod composed;
pub mod direct;

pub use assemble::{Assembled, Assembler};
pub use backend::{AssemblyError, PdfBackend, Strategy};
pub use composed::ComposedBackend;
pub use direct::DirectBackend;
