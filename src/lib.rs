pub mod canvas;
pub mod logging;
