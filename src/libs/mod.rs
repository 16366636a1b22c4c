pub mod color;
pub mod date;
pub mod draw;
pub mod geometry;
pub mod image;
pub mod io;
pub mod phylo;
