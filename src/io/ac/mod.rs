//! AnteChamber `.ac` molecules.

pub mod reader;

pub use reader::read;
