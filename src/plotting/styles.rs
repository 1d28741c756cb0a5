use plotters::style::RGBAColor;

/// Chart theme configuration
#[derive(Debug, Clone, Copy)]
pub struct ChartTheme {
    pub background_color: RGBAColor,
    pub text_color: RGBAColor,
    pub grid_color: RGBAColor,
    pub axis_color: RGBAColor,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background_color: RGBAColor(255, 255, 255, 1.0),
            text_color: RGBAColor(88, 28, 135, 1.0),
            grid_color: RGBAColor(147, 51, 234, 0.15),
            axis_color: RGBAColor(126, 34, 206, 1.0),
        }
    }
}

/// Chart style configuration
#[derive(Debug, Clone, Copy)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
    pub caption_size: u32,
    pub margin: u32,
    pub label_area_size: u32,
    /// Width of the legend swatch in pixels
    pub legend_width: i32,
}

impl ChartStyle {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 800,
            height: 480,
            font_size: 15,
            caption_size: 24,
            margin: 10,
            label_area_size: 50,
            legend_width: 20,
        }
    }
}
