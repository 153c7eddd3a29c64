pub mod format;

pub use format::BoxView;
