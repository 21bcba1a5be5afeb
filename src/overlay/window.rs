//! egui viewports backing the overlay surfaces.

use crate::overlay::layout::{DotDescriptor, Point};
use crate::overlay::session::SurfaceBinding;
use crate::overlay::style::DotStyle;
use crate::overlay::surface::SurfaceRect;
use eframe::egui;

const OVERLAY_TITLE: &str = "Sick Motion Overlay";

pub fn viewport_id(index: usize) -> egui::ViewportId {
    egui::ViewportId::from_hash_of(("sickmotion-overlay", index))
}

/// Borderless, transparent, click-through window covering `surface`.
pub fn overlay_viewport(surface: &SurfaceRect) -> egui::ViewportBuilder {
    egui::ViewportBuilder::default()
        .with_title(OVERLAY_TITLE)
        .with_position([surface.x as f32, surface.y as f32])
        .with_inner_size([surface.width as f32, surface.height as f32])
        .with_decorations(false)
        .with_resizable(false)
        .with_transparent(true)
        .with_mouse_passthrough(true)
        .with_always_on_top()
        .with_taskbar(false)
        .with_active(false)
}

/// Map a y-up surface point into the viewport's y-down screen space.
pub fn to_screen(rect: egui::Rect, height: f64, point: Point) -> egui::Pos2 {
    egui::pos2(
        rect.left() + point.x as f32,
        rect.top() + (height - point.y) as f32,
    )
}

pub fn paint_dots(
    painter: &egui::Painter,
    rect: egui::Rect,
    height: f64,
    dots: &[DotDescriptor],
    style: &DotStyle,
) {
    for dot in dots {
        let center = to_screen(rect, height, dot.position);
        painter.circle_filled(
            center,
            style.radius + style.shadow_radius,
            style.shadow(dot.opacity),
        );
        painter.circle_filled(center, style.radius, style.fill(dot.opacity));
    }
}

/// Show the overlay for one binding and return the size the window actually
/// has, in points.
pub fn show_overlay(
    ctx: &egui::Context,
    index: usize,
    binding: &SurfaceBinding,
    style: &DotStyle,
) -> Option<egui::Vec2> {
    let (_, height) = binding.renderer.size();
    ctx.show_viewport_immediate(
        viewport_id(index),
        overlay_viewport(&binding.surface),
        |ctx, class| {
            if matches!(class, egui::ViewportClass::Embedded) {
                return None;
            }
            let rect = ctx.screen_rect();
            let painter = ctx.layer_painter(egui::LayerId::background());
            paint_dots(&painter, rect, height, binding.renderer.dots(), style);
            Some(rect.size())
        },
    )
}

/// Work areas of the connected displays in points.
pub fn detect_surfaces(ctx: &egui::Context) -> Vec<SurfaceRect> {
    let pixels_per_point = ctx.pixels_per_point();
    let work_areas = crate::overlay::surface::enumerate_work_areas();
    if !work_areas.is_empty() {
        return work_areas
            .iter()
            .map(|rect| rect.scaled(1.0 / pixels_per_point))
            .collect();
    }

    ctx.input(|i| i.viewport().monitor_size)
        .map(|size| {
            vec![SurfaceRect::new(
                0,
                0,
                size.x.round() as i32,
                size.y.round() as i32,
            )]
        })
        .unwrap_or_default()
}
