mod sphere;
mod transaction;

pub use sphere::{is_uninformed_label, Sphere};
pub use transaction::Transaction;
