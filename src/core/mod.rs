pub mod codec;
pub mod dispatcher;
pub mod registry;

pub use crate::domain::model::{Boat, Location, LocationKind, Money};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
