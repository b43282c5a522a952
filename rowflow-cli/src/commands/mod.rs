pub mod both;
pub mod exec;
pub mod seed;
pub mod stream;
