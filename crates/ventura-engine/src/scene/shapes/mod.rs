pub(crate) mod mesh;
pub(crate) mod sprite;
