pub mod set;
pub mod store;

pub use set::SelectionSet;
pub use store::{DEFAULT_KEY, SelectionStore};
