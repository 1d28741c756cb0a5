pub mod color;
pub mod dates;
pub mod pagination;

pub use color::{series_color, SeriesColor};
pub use pagination::{paginate, Page};
