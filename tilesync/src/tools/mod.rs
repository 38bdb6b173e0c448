pub mod drivers;
pub mod layers;
pub mod serve;
pub mod sync;
