/// Widget and chart layers drawn with egui.
pub mod charts;
pub mod panels;
