mod component;
mod orbit;
mod render;
mod state;

pub use component::ForceGraphCanvas;
pub use orbit::ForceGraphOrbit;
