pub mod chart;
pub mod styles;

pub use chart::{generate_plot, generate_plot_async, render_chart};
pub use styles::{ChartStyle, ChartTheme};
