pub mod html;
pub mod labels;
pub mod page;
pub mod surface;
pub mod terminal;

pub use labels::Labels;
pub use page::{PageModel, PageSnapshot};
pub use surface::{MultiSurface, RenderSurface};
pub use terminal::TerminalSurface;
