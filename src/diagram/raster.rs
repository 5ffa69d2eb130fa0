use anyhow::{Context, Result};
use image::ImageEncoder;
use log::warn;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::ir::{DrawCommand, Point, Scene};
use super::palette::to_rgb;

const ARROW_LEN: f64 = 9.0;
const ARROW_HALF_WIDTH: f64 = 4.0;
const MAX_SIDE: u32 = 16_384;

/// Execute the scene's draw commands and encode the result as PNG
pub fn render_png(scene: &Scene) -> Result<Vec<u8>> {
    if scene.width == 0 || scene.height == 0 {
        anyhow::bail!(
            "Cannot render a diagram with an empty canvas ({}x{})",
            scene.width,
            scene.height
        );
    }

    if scene.width > MAX_SIDE || scene.height > MAX_SIDE {
        anyhow::bail!(
            "Diagram canvas {}x{} exceeds the {}px limit per side",
            scene.width,
            scene.height,
            MAX_SIDE
        );
    }
    let Some(len) = (scene.width as usize)
        .checked_mul(scene.height as usize)
        .and_then(|n| n.checked_mul(3))
    else {
        anyhow::bail!("Diagram canvas {}x{} is too large", scene.width, scene.height);
    };

    let mut buffer = vec![0u8; len];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (scene.width, scene.height))
            .into_drawing_area();

        root.fill(&WHITE)
            .context("Failed to fill background")?;

        for command in &scene.commands {
            match command {
                DrawCommand::Frame { tl, br } => {
                    root.draw(&Rectangle::new([*tl, *br], RGBColor(170, 170, 170).stroke_width(1)))
                        .context("Failed to draw cluster frame")?;
                }
                DrawCommand::Box { tl, br, label, bold } => {
                    root.draw(&Rectangle::new([*tl, *br], WHITE.filled()))
                        .context("Failed to fill node")?;
                    root.draw(&Rectangle::new([*tl, *br], BLACK.stroke_width(if *bold { 2 } else { 1 })))
                        .context("Failed to draw node")?;
                    let center = ((tl.0 + br.0) / 2, (tl.1 + br.1) / 2);
                    let style = ("sans-serif", 14)
                        .into_font()
                        .color(&BLACK)
                        .pos(Pos::new(HPos::Center, VPos::Center));
                    draw_label(&root, label, center, style);
                }
                DrawCommand::Arrow { from, to, color, label } => {
                    let rgb = to_rgb(color);
                    root.draw(&PathElement::new(vec![*from, *to], rgb.stroke_width(1)))
                        .context("Failed to draw edge")?;
                    if let Some(head) = arrow_head(*from, *to) {
                        root.draw(&Polygon::new(head, rgb.filled()))
                            .context("Failed to draw arrow head")?;
                    }
                    if let Some(label) = label {
                        let mid = ((from.0 + to.0) / 2, (from.1 + to.1) / 2 - 8);
                        let style = ("sans-serif", 11)
                            .into_font()
                            .color(&rgb)
                            .pos(Pos::new(HPos::Center, VPos::Center));
                        draw_label(&root, label, mid, style);
                    }
                }
                DrawCommand::Text { pos, text, size } => {
                    let style = ("sans-serif", *size)
                        .into_font()
                        .color(&BLACK)
                        .pos(Pos::new(HPos::Left, VPos::Top));
                    for (i, line) in text.lines().enumerate() {
                        let at = (pos.0, pos.1 + i as i32 * (*size as i32 + 4));
                        draw_label(&root, line, at, style.clone());
                    }
                }
            }
        }

        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(
                &buffer,
                scene.width,
                scene.height,
                image::ColorType::Rgb8,
            )
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

/// Text needs a system font; a missing font degrades to an unlabelled diagram
fn draw_label(root: &DrawingArea<BitMapBackend, plotters::coord::Shift>, text: &str, at: Point, style: TextStyle) {
    if let Err(e) = root.draw(&Text::new(text, at, style)) {
        warn!("could not draw label '{}': {}", text, e);
    }
}

/// Triangle at `to`, pointing away from `from`
fn arrow_head(from: Point, to: Point) -> Option<Vec<Point>> {
    let dx = (to.0 - from.0) as f64;
    let dy = (to.1 - from.1) as f64;
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1.0 {
        return None;
    }
    let (ux, uy) = (dx / len, dy / len);
    let base = (to.0 as f64 - ux * ARROW_LEN, to.1 as f64 - uy * ARROW_LEN);
    let left = (base.0 - uy * ARROW_HALF_WIDTH, base.1 + ux * ARROW_HALF_WIDTH);
    let right = (base.0 + uy * ARROW_HALF_WIDTH, base.1 - ux * ARROW_HALF_WIDTH);
    Some(vec![
        to,
        (left.0.round() as i32, left.1.round() as i32),
        (right.0.round() as i32, right.1.round() as i32),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_valid_png(bytes: &[u8]) -> bool {
        bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
    }

    #[test]
    fn test_render_empty_scene() {
        let scene = Scene {
            width: 40,
            height: 30,
            commands: vec![],
        };
        let png = render_png(&scene).unwrap();
        assert!(is_valid_png(&png));
    }

    #[test]
    fn test_render_shapes() {
        let scene = Scene {
            width: 200,
            height: 100,
            commands: vec![
                DrawCommand::Frame { tl: (5, 5), br: (195, 95) },
                DrawCommand::Arrow {
                    from: (60, 50),
                    to: (120, 50),
                    color: "red".to_string(),
                    label: None,
                },
                DrawCommand::Box {
                    tl: (10, 35),
                    br: (60, 65),
                    label: String::new(),
                    bold: true,
                },
            ],
        };
        let png = render_png(&scene).unwrap();
        assert!(is_valid_png(&png));
    }

    #[test]
    fn test_render_oversized_canvas_fails() {
        let scene = Scene {
            width: 40000,
            height: 40000,
            commands: vec![],
        };
        let err = render_png(&scene).unwrap_err();
        assert!(err.to_string().contains("40000x40000"));

        let scene = Scene {
            width: u32::MAX,
            height: 1,
            commands: vec![],
        };
        assert!(render_png(&scene).is_err());
    }

    #[test]
    fn test_render_zero_canvas_fails() {
        let scene = Scene {
            width: 0,
            height: 10,
            commands: vec![],
        };
        assert!(render_png(&scene).is_err());
    }

    #[test]
    fn test_arrow_head_points_at_target() {
        let head = arrow_head((0, 0), (20, 0)).unwrap();
        assert_eq!(head[0], (20, 0));
        assert_eq!(head[1], (11, 4));
        assert_eq!(head[2], (11, -4));
        assert!(arrow_head((3, 3), (3, 3)).is_none());
    }
}
