pub mod instrument;
pub mod scene;
pub mod simulation;
pub mod spectrum;
pub mod target;

pub use instrument::*;
pub use scene::*;
pub use simulation::*;
pub use spectrum::*;
pub use target::*;
