//! Card input: observable state, manual entry and the card form.

mod dynamic;
mod form;
mod keystroke;
mod model;

pub(crate) use dynamic::lock;
pub use dynamic::{Dynamic, Listener};
pub use form::CardForm;
pub use keystroke::{EditOutcome, EditRejection, ManualEntry};
pub use model::{CardInputModel, CardInputState};
