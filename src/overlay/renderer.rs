use crate::clock::Ticker;
use crate::cue::{clamped, CueVector, RENDERED_CUE_LIMIT};
use crate::overlay::layout::{layout_dots, DotDescriptor, Point};

pub const ANIMATION_RATE_HZ: f64 = 60.0;
pub const SPRING_STIFFNESS: f64 = 16.0;
pub const SPRING_DAMPING: f64 = 0.8;
pub const MIN_OPACITY: f64 = 0.5;
pub const MAX_OPACITY: f64 = 0.88;
/// Rendered magnitude that adds one full unit of opacity.
const OPACITY_SPAN: f64 = 36.0;

pub fn opacity_for(rendered: CueVector) -> f64 {
    clamped(
        MIN_OPACITY + rendered.magnitude() / OPACITY_SPAN,
        MIN_OPACITY,
        MAX_OPACITY,
    )
}

/// Spring-damped dot animation for one surface.
///
/// The spring state lives on the renderer, not on each dot: every dot shares
/// the same offset and opacity on a given tick. A disposed renderer ignores
/// every further tick and target update.
#[derive(Debug, Clone)]
pub struct CueRenderer {
    width: f64,
    height: f64,
    dots: Vec<DotDescriptor>,
    target: CueVector,
    rendered: CueVector,
    velocity: CueVector,
    opacity: f64,
    ticker: Ticker,
    disposed: bool,
}

impl CueRenderer {
    pub fn new(width: f64, height: f64, now: f64) -> Self {
        let mut ticker = Ticker::with_rate(ANIMATION_RATE_HZ);
        ticker.arm(now);
        let mut renderer = Self {
            width,
            height,
            dots: layout_dots(width, height),
            target: CueVector::ZERO,
            rendered: CueVector::ZERO,
            velocity: CueVector::ZERO,
            opacity: MIN_OPACITY,
            ticker,
            disposed: false,
        };
        renderer.apply_to_dots();
        renderer
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn dots(&self) -> &[DotDescriptor] {
        &self.dots
    }

    pub fn target(&self) -> CueVector {
        self.target
    }

    pub fn rendered(&self) -> CueVector {
        self.rendered
    }

    pub fn velocity(&self) -> CueVector {
        self.velocity
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Record the cue to chase. Dots move on the next tick.
    pub fn set_target_cue(&mut self, cue: CueVector) {
        if self.disposed {
            return;
        }
        self.target = cue;
    }

    /// Advance the spring by one fixed step.
    pub fn step(&mut self) {
        if self.disposed {
            return;
        }
        let dt = self.ticker.period();
        self.velocity = CueVector::new(
            (self.velocity.x + (self.target.x - self.rendered.x) * SPRING_STIFFNESS * dt)
                * SPRING_DAMPING,
            (self.velocity.y + (self.target.y - self.rendered.y) * SPRING_STIFFNESS * dt)
                * SPRING_DAMPING,
        );
        self.rendered = CueVector::new(
            self.rendered.x + self.velocity.x,
            self.rendered.y + self.velocity.y,
        )
        .clamped(RENDERED_CUE_LIMIT);
        self.apply_to_dots();
    }

    /// Run every animation tick that is due. Returns how many ran.
    pub fn poll(&mut self, now: f64) -> u32 {
        if self.disposed {
            return 0;
        }
        let due = self.ticker.due(now);
        for _ in 0..due {
            self.step();
        }
        due
    }

    /// Regenerate anchors for a new geometry. The spring state carries over.
    pub fn resize(&mut self, width: f64, height: f64) {
        if self.disposed || (self.width == width && self.height == height) {
            return;
        }
        tracing::debug!(width, height, "regenerating overlay dots");
        self.width = width;
        self.height = height;
        self.dots = layout_dots(width, height);
        self.apply_to_dots();
    }

    /// Jump straight to `cue` with no velocity and render that frame.
    pub fn settle_to(&mut self, cue: CueVector) {
        if self.disposed {
            return;
        }
        self.target = cue;
        self.rendered = cue.clamped(RENDERED_CUE_LIMIT);
        self.velocity = CueVector::ZERO;
        self.apply_to_dots();
    }

    /// Cancel the animation timer. Further ticks are ignored.
    pub fn dispose(&mut self) {
        self.ticker.cancel();
        self.disposed = true;
    }

    fn apply_to_dots(&mut self) {
        self.opacity = opacity_for(self.rendered);
        let offset = self.rendered;
        let opacity = self.opacity;
        for dot in self.dots.iter_mut() {
            dot.position = Point::new(dot.base.x + offset.x, dot.base.y + offset.y);
            dot.opacity = opacity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{opacity_for, CueRenderer, MAX_OPACITY, MIN_OPACITY};
    use crate::cue::CueVector;

    #[test]
    fn target_alone_does_not_move_dots() {
        let mut renderer = CueRenderer::new(1200.0, 800.0, 0.0);
        renderer.set_target_cue(CueVector::new(10.0, -10.0));
        assert_eq!(renderer.rendered(), CueVector::ZERO);
        assert!(renderer
            .dots()
            .iter()
            .all(|dot| dot.position == dot.base));
    }

    #[test]
    fn first_step_follows_spring_formula() {
        let mut renderer = CueRenderer::new(1200.0, 800.0, 0.0);
        renderer.set_target_cue(CueVector::new(6.0, 0.0));
        renderer.step();
        let expected = 6.0 * 16.0 / 60.0 * 0.8;
        assert!((renderer.velocity().x - expected).abs() < 1e-12);
        assert!((renderer.rendered().x - expected).abs() < 1e-12);
        let dot = renderer.dots()[0];
        assert!((dot.position.x - (dot.base.x + expected)).abs() < 1e-12);
        assert_eq!(dot.position.y, dot.base.y);
    }

    #[test]
    fn spring_converges_and_stays_within_render_limit() {
        let mut renderer = CueRenderer::new(1200.0, 800.0, 0.0);
        renderer.set_target_cue(CueVector::new(40.0, -40.0));
        for _ in 0..600 {
            renderer.step();
            let rendered = renderer.rendered();
            assert!(rendered.x.abs() <= 18.0 && rendered.y.abs() <= 18.0);
        }
        assert_eq!(renderer.rendered(), CueVector::new(18.0, -18.0));

        renderer.set_target_cue(CueVector::new(3.0, 4.0));
        for _ in 0..600 {
            renderer.step();
        }
        assert!((renderer.rendered().x - 3.0).abs() < 1e-6);
        assert!((renderer.rendered().y - 4.0).abs() < 1e-6);
    }

    #[test]
    fn opacity_is_shared_and_bounded() {
        assert_eq!(opacity_for(CueVector::ZERO), MIN_OPACITY);
        assert!((opacity_for(CueVector::new(3.0, 4.0)) - (0.5 + 5.0 / 36.0)).abs() < 1e-12);
        assert_eq!(opacity_for(CueVector::new(18.0, 18.0)), MAX_OPACITY);

        let mut renderer = CueRenderer::new(1200.0, 800.0, 0.0);
        renderer.set_target_cue(CueVector::new(8.0, 8.0));
        renderer.step();
        let opacity = renderer.opacity();
        assert!(renderer.dots().iter().all(|dot| dot.opacity == opacity));
    }

    #[test]
    fn resize_regenerates_anchors_but_keeps_spring_state() {
        let mut renderer = CueRenderer::new(1200.0, 800.0, 0.0);
        renderer.set_target_cue(CueVector::new(5.0, 5.0));
        renderer.step();
        let rendered = renderer.rendered();
        let velocity = renderer.velocity();

        renderer.resize(1920.0, 1080.0);
        assert_eq!(renderer.dots().len(), 20 * 2 + 9 * 2);
        assert_eq!(renderer.rendered(), rendered);
        assert_eq!(renderer.velocity(), velocity);
        let dot = renderer.dots()[0];
        assert_eq!(dot.position.x, dot.base.x + rendered.x);
    }

    #[test]
    fn poll_runs_due_ticks_and_disposed_renderer_is_inert() {
        let mut renderer = CueRenderer::new(1200.0, 800.0, 0.0);
        renderer.set_target_cue(CueVector::new(5.0, 0.0));
        assert_eq!(renderer.poll(1.0 / 60.0), 1);
        let rendered = renderer.rendered();

        renderer.dispose();
        assert_eq!(renderer.poll(1.0), 0);
        renderer.set_target_cue(CueVector::new(-5.0, 0.0));
        renderer.step();
        assert_eq!(renderer.rendered(), rendered);
        assert_eq!(renderer.target(), CueVector::new(5.0, 0.0));
    }

    #[test]
    fn settle_snaps_to_cue_without_velocity() {
        let mut renderer = CueRenderer::new(1200.0, 800.0, 0.0);
        renderer.set_target_cue(CueVector::new(9.0, 9.0));
        renderer.step();
        renderer.settle_to(CueVector::ZERO);
        assert_eq!(renderer.rendered(), CueVector::ZERO);
        assert_eq!(renderer.velocity(), CueVector::ZERO);
        assert_eq!(renderer.opacity(), MIN_OPACITY);
        assert!(renderer
            .dots()
            .iter()
            .all(|dot| dot.position == dot.base));
    }
}
