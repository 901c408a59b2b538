pub mod animation;
pub mod bar;
pub mod dashboard;
pub mod help;
pub mod map;
pub mod scatter;
