//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod user;
pub mod resort;
pub mod review;
pub mod pagination;

pub use validation::ValidationError;
pub use user::{Nickname, Password, Username};
pub use resort::{ResortDraft, ResortInput, ResortType};
pub use review::{ReviewDraft, ReviewInput};
pub use pagination::{Window, WindowParams};
