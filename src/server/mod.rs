pub mod app;
mod dispatch;
mod endpoint;

pub use dispatch::{Dispatcher, Routes};
pub use endpoint::{Endpoint, Env};
