use eframe::egui::Color32;

pub const DOT_RADIUS: f32 = 4.5;
pub const SHADOW_RADIUS: f32 = 1.6;

/// Dot paint for one theme. The renderer's per-tick opacity scales both
/// `fill_alpha` and `shadow_alpha`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotStyle {
    pub fill_level: f32,
    pub fill_alpha: f32,
    pub shadow_alpha: f32,
    pub radius: f32,
    pub shadow_radius: f32,
}

impl DotStyle {
    pub fn for_theme(dark: bool) -> Self {
        let (fill_level, fill_alpha, shadow_alpha) = if dark {
            (0.93, 0.88, 0.35)
        } else {
            (0.22, 0.72, 0.2)
        };
        Self {
            fill_level,
            fill_alpha,
            shadow_alpha,
            radius: DOT_RADIUS,
            shadow_radius: SHADOW_RADIUS,
        }
    }

    pub fn fill(&self, opacity: f64) -> Color32 {
        let level = unit_to_byte(self.fill_level);
        let alpha = unit_to_byte(self.fill_alpha * opacity as f32);
        Color32::from_rgba_unmultiplied(level, level, level, alpha)
    }

    pub fn shadow(&self, opacity: f64) -> Color32 {
        let alpha = unit_to_byte(self.shadow_alpha * opacity as f32);
        Color32::from_rgba_unmultiplied(0, 0, 0, alpha)
    }
}

fn unit_to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::DotStyle;

    #[test]
    fn dark_theme_uses_light_dots() {
        let style = DotStyle::for_theme(true);
        let fill = style.fill(1.0);
        assert_eq!(fill.a(), 224);
        assert_eq!(style.shadow(1.0).a(), 89);
        assert!(style.fill_level > DotStyle::for_theme(false).fill_level);
    }

    #[test]
    fn opacity_dims_fill_and_shadow_together() {
        let style = DotStyle::for_theme(false);
        assert_eq!(style.fill(0.5).a(), 92);
        assert_eq!(style.fill(0.0).a(), 0);
        assert_eq!(style.shadow(1.0).a(), 51);
        assert_eq!(style.shadow(0.5).a(), 26);
        assert_eq!(style.shadow(0.0).a(), 0);
    }
}
