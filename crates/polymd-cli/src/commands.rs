pub mod mass;
pub mod normalize;
pub mod prepare;
