mod assets;
mod error;
mod form;
mod map;
mod model;
mod registry;
mod session;
mod store;

pub use assets::*;
pub use error::*;
pub use form::*;
pub use map::*;
pub use model::*;
pub use registry::*;
pub use session::*;
pub use store::*;
