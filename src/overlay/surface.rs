/// Work area of one display, in logical points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct SurfaceRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl SurfaceRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn size(&self) -> (f64, f64) {
        (f64::from(self.width), f64::from(self.height))
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Convert physical pixels to logical points.
    pub fn scaled(&self, factor: f32) -> Self {
        let scale = |value: i32| (value as f32 * factor).round() as i32;
        Self {
            x: scale(self.x),
            y: scale(self.y),
            width: scale(self.width),
            height: scale(self.height),
        }
    }
}

/// Drop degenerate rects and exact duplicates (mirrored displays), keeping
/// the platform's order.
pub fn normalize_surfaces(surfaces: Vec<SurfaceRect>) -> Vec<SurfaceRect> {
    let mut normalized: Vec<SurfaceRect> = Vec::with_capacity(surfaces.len());
    for rect in surfaces {
        if !rect.is_empty() && !normalized.contains(&rect) {
            normalized.push(rect);
        }
    }
    normalized
}

/// Work areas (excluding taskbars) of every attached display, in physical
/// pixels. Empty when the platform offers no enumeration.
pub fn enumerate_work_areas() -> Vec<SurfaceRect> {
    #[cfg(windows)]
    {
        platform::enumerate_work_areas()
    }

    #[cfg(not(windows))]
    {
        Vec::new()
    }
}

#[cfg(windows)]
mod platform {
    use super::SurfaceRect;
    use std::mem;
    use windows::Win32::Foundation::{BOOL, LPARAM, RECT};
    use windows::Win32::Graphics::Gdi::{
        EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFOEXW,
    };

    pub(super) fn enumerate_work_areas() -> Vec<SurfaceRect> {
        extern "system" fn monitor_enum_proc(
            monitor: HMONITOR,
            _hdc: HDC,
            _rc_clip: *mut RECT,
            data: LPARAM,
        ) -> BOOL {
            let surfaces = unsafe { &mut *(data.0 as *mut Vec<SurfaceRect>) };
            let mut info = MONITORINFOEXW::default();
            info.monitorInfo.cbSize = mem::size_of::<MONITORINFOEXW>() as u32;
            if unsafe { GetMonitorInfoW(monitor, &mut info.monitorInfo as *mut _ as *mut _) }
                .as_bool()
            {
                let rc = info.monitorInfo.rcWork;
                surfaces.push(SurfaceRect {
                    x: rc.left,
                    y: rc.top,
                    width: rc.right - rc.left,
                    height: rc.bottom - rc.top,
                });
            }
            BOOL(1)
        }

        let mut surfaces = Vec::new();
        unsafe {
            let _ = EnumDisplayMonitors(
                HDC::default(),
                None,
                Some(monitor_enum_proc),
                LPARAM(&mut surfaces as *mut Vec<SurfaceRect> as isize),
            );
        }
        surfaces
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_surfaces, SurfaceRect};

    #[test]
    fn normalize_drops_empty_and_mirrored_surfaces() {
        let primary = SurfaceRect::new(0, 0, 1920, 1080);
        let left = SurfaceRect::new(-1920, 0, 1920, 1080);
        let surfaces = vec![primary, SurfaceRect::new(0, 0, 0, 1080), left, primary];
        assert_eq!(normalize_surfaces(surfaces), vec![primary, left]);
    }

    #[test]
    fn scaling_converts_pixels_to_points() {
        let rect = SurfaceRect::new(2560, 0, 2560, 1400);
        assert_eq!(rect.scaled(0.5), SurfaceRect::new(1280, 0, 1280, 700));
    }
}
