pub mod clock;
pub mod config;
pub mod controller;
pub mod evasion;
pub mod fx;
pub mod parallax;
pub mod particles;
pub mod reveal;

pub use clock::*;
pub use config::*;
pub use controller::*;
pub use evasion::*;
pub use fx::*;
pub use parallax::*;
pub use particles::*;
pub use reveal::*;
