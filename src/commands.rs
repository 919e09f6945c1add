pub mod pack;
pub mod unpack;
