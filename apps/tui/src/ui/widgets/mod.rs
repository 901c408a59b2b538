pub mod loading;
pub mod popup;
pub mod wave_picker;
