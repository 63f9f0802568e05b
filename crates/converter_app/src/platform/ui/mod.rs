pub(crate) mod palette;
pub(crate) mod render;
pub(crate) mod screen;
