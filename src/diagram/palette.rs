// Colors for reference edges

use plotters::style::RGBColor;

/// Ordered palette; binding slot `k` gets color `k` (wrapping)
pub struct ColorPalette {
    colors: Vec<String>,
}

impl ColorPalette {
    /// Slot 0 is red and slot 1 blue (duration, pitch), then a Category10 tail
    pub fn bindings() -> Self {
        ColorPalette {
            colors: vec![
                "red".to_string(),
                "blue".to_string(),
                "green".to_string(),
                "orange".to_string(),
                "purple".to_string(),
                "brown".to_string(),
                "pink".to_string(),
                "olive".to_string(),
                "cyan".to_string(),
            ],
        }
    }

    /// Get color for a specific index (wraps around if index > palette size)
    pub fn get_color(&self, index: usize) -> String {
        self.colors[index % self.colors.len()].clone()
    }
}

/// Map a palette color name to RGB; unknown names draw black
pub fn to_rgb(name: &str) -> RGBColor {
    match name {
        "red" => RGBColor(214, 39, 40),
        "blue" => RGBColor(31, 119, 180),
        "green" => RGBColor(44, 160, 44),
        "orange" => RGBColor(255, 127, 14),
        "purple" => RGBColor(148, 103, 189),
        "brown" => RGBColor(140, 86, 75),
        "pink" => RGBColor(227, 119, 194),
        "gray" => RGBColor(127, 127, 127),
        "olive" => RGBColor(188, 189, 34),
        "cyan" => RGBColor(23, 190, 207),
        _ => RGBColor(0, 0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_palette_order() {
        let palette = ColorPalette::bindings();
        assert_eq!(palette.get_color(0), "red");
        assert_eq!(palette.get_color(1), "blue");
        assert_eq!(palette.get_color(8), "cyan");
        // Test wrapping
        assert_eq!(palette.get_color(9), "red");
    }

    #[test]
    fn test_every_palette_color_has_rgb() {
        let palette = ColorPalette::bindings();
        for i in 0..9 {
            let RGBColor(r, g, b) = to_rgb(&palette.get_color(i));
            assert_ne!((r, g, b), (0, 0, 0));
        }
        let RGBColor(r, g, b) = to_rgb("chartreuse");
        assert_eq!((r, g, b), (0, 0, 0));
    }
}
