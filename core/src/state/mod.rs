pub mod reducer;
pub mod sequence;
pub mod store;

pub use reducer::{reduce, Action, FireDataState};
pub use sequence::{FieldGroup, RequestSequencer, Ticket};
pub use store::Store;
