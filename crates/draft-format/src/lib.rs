pub mod errors;
pub mod load;
pub mod save;
pub mod svg_export;

pub use errors::LoadError;
pub use load::load_drawing;
pub use save::{save_drawing, FORMAT_NAME, FORMAT_VERSION};
pub use svg_export::export_svg;
