pub mod keyframes;
pub mod script;
