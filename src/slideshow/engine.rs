use std::time::Duration;

use tracing::{debug, info, warn};

use crate::constants::*;
use crate::engine::{Compositor, Frame, ImageLoader, SlideImage};
use crate::slideshow::state::{Mode, Phase};

/// Hold and transition lengths of one slideshow flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub hold: Duration,
    pub transition: Duration,
}

impl Timing {
    pub const GALLERY: Timing = Timing { hold: HOLD_DURATION, transition: TRANSITION_DURATION };
    pub const HERO: Timing = Timing { hold: HERO_HOLD_DURATION, transition: HERO_TRANSITION_DURATION };
}

/// Cycles through a fixed list of images, alternating a hold phase with a
/// blend into the next image. Driven entirely by [`advance`](Self::advance).
pub struct SlideshowEngine<I> {
    slides: Vec<I>,
    timing: Timing,
    mode: Mode,

    phase: Phase,
    current_index: usize,
    next_index: usize,
    progress: f32,
    phase_elapsed: Duration,

    // Seconds since start, feeds the noise animation
    clock: f32,
}

impl<I: SlideImage> SlideshowEngine<I> {
    /// Loads every source in order, skipping the ones that fail, and begins
    /// holding on the first image.
    pub fn start<L>(sources: &[String], loader: &mut L, timing: Timing) -> Self
    where
        L: ImageLoader<Image = I>,
    {
        let mut slides = Vec::with_capacity(sources.len());
        for source in sources {
            match loader.load(source) {
                Ok(image) => {
                    debug!(source = source.as_str(), width = image.width(), height = image.height(), "loaded slide");
                    slides.push(image);
                }
                Err(e) => warn!("Skipping slide {}: {}", source, e),
            }
        }

        let mode = match slides.len() {
            0 => Mode::Fallback,
            1 => Mode::Static,
            _ => Mode::Cycling,
        };
        info!("Slideshow started with {} of {} images ({:?})", slides.len(), sources.len(), mode);

        Self {
            next_index: if slides.len() > 1 { 1 } else { 0 },
            slides,
            timing,
            mode,
            phase: Phase::Holding,
            current_index: 0,
            progress: 0.0,
            phase_elapsed: Duration::ZERO,
            clock: 0.0,
        }
    }

    /// Moves the hold/transition timer forward by the wall-clock time since
    /// the previous frame.
    pub fn advance(&mut self, dt: Duration) {
        if self.mode != Mode::Cycling {
            return;
        }
        self.clock += dt.as_secs_f32();

        match self.phase {
            Phase::Holding => {
                self.phase_elapsed += dt;
                if self.phase_elapsed >= self.timing.hold {
                    self.begin_transition();
                }
            }
            Phase::Transitioning => {
                self.phase_elapsed += dt;
                let t = self.phase_elapsed.as_secs_f32() / self.timing.transition.as_secs_f32();
                self.progress = t.min(1.0);
                if self.progress >= 1.0 {
                    // Promote next to current and restart the hold
                    self.current_index = (self.current_index + 1) % self.slides.len();
                    self.next_index = self.current_index;
                    self.phase = Phase::Holding;
                    self.progress = 0.0;
                    self.phase_elapsed = Duration::ZERO;
                }
            }
        }
    }

    fn begin_transition(&mut self) {
        self.next_index = (self.current_index + 1) % self.slides.len();
        self.phase = Phase::Transitioning;
        self.progress = 0.0;
        self.phase_elapsed = Duration::ZERO;
    }

    /// Ends the hold right away; the next `advance` starts blending into the
    /// following image. Mid-transition, the blend restarts from zero.
    pub fn skip_forward(&mut self) {
        if self.mode != Mode::Cycling {
            return;
        }
        self.phase = Phase::Holding;
        self.progress = 0.0;
        self.phase_elapsed = self.timing.hold;
    }

    /// Steps the current image back by one, then behaves like
    /// [`skip_forward`](Self::skip_forward).
    pub fn skip_backward(&mut self) {
        if self.mode != Mode::Cycling {
            return;
        }
        let len = self.slides.len();
        self.current_index = (self.current_index + len - 1) % len;
        self.next_index = (self.current_index + 1) % len;
        self.skip_forward();
    }

    pub fn render<T, C>(&self, compositor: &mut C, target: &mut T)
    where
        T: ?Sized,
        C: Compositor<I, T>,
    {
        let (current, next) = match self.mode {
            Mode::Fallback => return,
            Mode::Static => (&self.slides[0], &self.slides[0]),
            Mode::Cycling => (&self.slides[self.current_index], &self.slides[self.next_index]),
        };
        compositor.composite(
            target,
            &Frame { current, next, progress: self.progress, time: self.clock },
        );
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// True when nothing loaded and the static fallback must stay on screen.
    pub fn shows_fallback(&self) -> bool {
        self.mode == Mode::Fallback
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[cfg(test)]
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    #[cfg(test)]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[cfg(test)]
    pub fn hold_remaining(&self) -> Duration {
        match self.phase {
            Phase::Holding => self.timing.hold.saturating_sub(self.phase_elapsed),
            Phase::Transitioning => Duration::ZERO,
        }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LoadError, SourceError};
    use crate::sources::{ManifestFetcher, SourceResolver};

    #[derive(Debug, Clone, PartialEq)]
    struct FakeImage {
        name: String,
        width: u32,
        height: u32,
    }

    impl SlideImage for FakeImage {
        fn width(&self) -> u32 {
            self.width
        }
        fn height(&self) -> u32 {
            self.height
        }
    }

    #[derive(Default)]
    struct FakeLoader {
        failing: Vec<&'static str>,
        requested: Vec<String>,
    }

    impl ImageLoader for FakeLoader {
        type Image = FakeImage;

        fn load(&mut self, source: &str) -> Result<FakeImage, LoadError> {
            self.requested.push(source.to_string());
            if self.failing.iter().any(|f| *f == source) {
                return Err(LoadError::Decode(source.to_string(), "corrupt".to_string()));
            }
            Ok(FakeImage { name: source.to_string(), width: 1600, height: 900 })
        }
    }

    #[derive(Default)]
    struct RecordingCompositor {
        frames: Vec<(String, String, f32)>,
    }

    impl Compositor<FakeImage, ()> for RecordingCompositor {
        fn composite(&mut self, _target: &mut (), frame: &Frame<'_, FakeImage>) {
            self.frames.push((frame.current.name.clone(), frame.next.name.clone(), frame.progress));
        }
    }

    fn sources(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn cycling(names: &[&str]) -> SlideshowEngine<FakeImage> {
        SlideshowEngine::start(&sources(names), &mut FakeLoader::default(), Timing::GALLERY)
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn starts_holding_on_first_image() {
        let engine = cycling(&["a.jpg", "b.jpg", "c.jpg"]);
        assert_eq!(engine.mode(), Mode::Cycling);
        assert_eq!(engine.current_index(), 0);
        assert_eq!(engine.next_index(), 1);
        assert_eq!(engine.phase(), Phase::Holding);
        assert_eq!(engine.hold_remaining(), HOLD_DURATION);
    }

    #[test]
    fn hold_elapsing_exactly_starts_transition_at_zero() {
        let mut engine = cycling(&["a.jpg", "b.jpg", "c.jpg"]);
        engine.advance(ms(1000));
        engine.advance(ms(1000));
        assert_eq!(engine.phase(), Phase::Holding);
        engine.advance(ms(800));
        assert_eq!(engine.phase(), Phase::Transitioning);
        assert_eq!(engine.progress(), 0.0);
        assert_eq!(engine.next_index(), 1);
    }

    #[test]
    fn split_deltas_match_single_delta() {
        let mut split = cycling(&["a.jpg", "b.jpg"]);
        let mut whole = cycling(&["a.jpg", "b.jpg"]);

        split.advance(ms(700));
        split.advance(ms(900));
        whole.advance(ms(1600));
        assert_eq!(split.phase(), whole.phase());
        assert_eq!(split.hold_remaining(), whole.hold_remaining());

        // Same inside a transition
        split.advance(ms(1200));
        whole.advance(ms(1200));
        split.advance(ms(250));
        split.advance(ms(350));
        whole.advance(ms(600));
        assert_eq!(split.phase(), Phase::Transitioning);
        assert_eq!(split.progress(), whole.progress());
    }

    #[test]
    fn progress_is_monotonic_and_clamped() {
        let mut engine = cycling(&["a.jpg", "b.jpg"]);
        engine.advance(HOLD_DURATION);

        let mut last = engine.progress();
        for _ in 0..20 {
            engine.advance(ms(70));
            if engine.phase() != Phase::Transitioning {
                break;
            }
            let p = engine.progress();
            assert!(p >= last, "{p} < {last}");
            assert!((0.0..=1.0).contains(&p));
            last = p;
        }
        assert!(last > 0.85);
    }

    #[test]
    fn completed_transition_advances_index_and_resets_hold() {
        let mut engine = cycling(&["a.jpg", "b.jpg", "c.jpg"]);
        engine.advance(HOLD_DURATION);
        engine.advance(TRANSITION_DURATION + ms(500));
        assert_eq!(engine.current_index(), 1);
        assert_eq!(engine.phase(), Phase::Holding);
        assert_eq!(engine.progress(), 0.0);
        assert_eq!(engine.hold_remaining(), HOLD_DURATION);
    }

    #[test]
    fn index_wraps_after_last_image() {
        let mut engine = cycling(&["a.jpg", "b.jpg"]);
        for _ in 0..2 {
            engine.advance(HOLD_DURATION);
            engine.advance(TRANSITION_DURATION);
        }
        assert_eq!(engine.current_index(), 0);
    }

    #[test]
    fn skip_backward_during_hold_steps_back_and_transitions_next_frame() {
        let mut engine = cycling(&["a.jpg", "b.jpg", "c.jpg"]);
        engine.advance(ms(500));
        engine.skip_backward();
        assert_eq!(engine.current_index(), 2);
        assert_eq!(engine.next_index(), 0);
        assert_eq!(engine.hold_remaining(), Duration::ZERO);

        engine.advance(Duration::ZERO);
        assert_eq!(engine.phase(), Phase::Transitioning);
        assert_eq!(engine.progress(), 0.0);
    }

    #[test]
    fn skip_forward_mid_transition_restarts_the_blend() {
        let mut engine = cycling(&["a.jpg", "b.jpg", "c.jpg"]);
        engine.advance(HOLD_DURATION);
        engine.advance(ms(800));
        assert!(engine.progress() > 0.4);

        engine.skip_forward();
        engine.skip_forward();
        assert_eq!(engine.phase(), Phase::Holding);
        assert_eq!(engine.current_index(), 0);

        engine.advance(ms(16));
        assert_eq!(engine.phase(), Phase::Transitioning);
        assert_eq!(engine.progress(), 0.0);
        assert_eq!(engine.next_index(), 1);
    }

    #[test]
    fn failed_images_are_left_out() {
        let mut loader = FakeLoader { failing: vec!["b.jpg"], ..Default::default() };
        let engine = SlideshowEngine::start(&sources(&["a.jpg", "b.jpg", "c.jpg"]), &mut loader, Timing::GALLERY);
        assert_eq!(loader.requested.len(), 3);
        assert_eq!(engine.len(), 2);

        let mut compositor = RecordingCompositor::default();
        engine.render(&mut compositor, &mut ());
        assert_eq!(compositor.frames[0].1, "c.jpg");
    }

    #[test]
    fn single_image_is_static() {
        let mut engine = cycling(&["only.jpg"]);
        assert_eq!(engine.mode(), Mode::Static);
        engine.advance(HOLD_DURATION * 3);
        engine.skip_forward();
        engine.advance(ms(16));
        assert_eq!(engine.phase(), Phase::Holding);

        let mut compositor = RecordingCompositor::default();
        engine.render(&mut compositor, &mut ());
        assert_eq!(compositor.frames, vec![("only.jpg".to_string(), "only.jpg".to_string(), 0.0)]);
    }

    #[test]
    fn render_passes_progress_and_both_slots() {
        let mut engine = cycling(&["a.jpg", "b.jpg"]);
        engine.advance(HOLD_DURATION);
        engine.advance(TRANSITION_DURATION / 2);

        let mut compositor = RecordingCompositor::default();
        engine.render(&mut compositor, &mut ());
        let (current, next, progress) = &compositor.frames[0];
        assert_eq!(current, "a.jpg");
        assert_eq!(next, "b.jpg");
        assert!((progress - 0.5).abs() < 1e-4);
    }

    struct StaticFetcher(Result<&'static str, ()>);

    impl ManifestFetcher for StaticFetcher {
        fn fetch(&self, location: &str) -> Result<String, SourceError> {
            match self.0 {
                Ok(body) => Ok(body.to_string()),
                Err(()) => Err(SourceError::Status { location: location.to_string(), status: 404 }),
            }
        }
    }

    #[test]
    fn manifest_to_first_completed_transition() {
        let resolver = SourceResolver::new(None, Some("assets/images/gallery.json".into()), &["fallback.jpg"]);
        let list = resolver.resolve(&StaticFetcher(Ok(r#"["a.jpg","b.jpg"]"#)));
        assert_eq!(list, vec!["assets/images/a.jpg", "assets/images/b.jpg"]);

        let mut loader = FakeLoader::default();
        let mut engine = SlideshowEngine::start(&list, &mut loader, Timing::GALLERY);
        assert_eq!(engine.len(), 2);
        assert_eq!(engine.phase(), Phase::Holding);

        let total = HOLD_DURATION + TRANSITION_DURATION;
        let frame = ms(16);
        let mut elapsed = Duration::ZERO;
        while elapsed < total + frame * 2 {
            engine.advance(frame);
            elapsed += frame;
        }
        assert_eq!(engine.current_index(), 1);
        assert_eq!(engine.phase(), Phase::Holding);
    }

    #[test]
    fn empty_manifest_and_missing_fallback_keeps_fallback_visible() {
        let resolver = SourceResolver::new(None, Some("assets/images/gallery.json".into()), &["Banners/Banner.jpg"]);
        let list = resolver.resolve(&StaticFetcher(Ok("[]")));
        assert_eq!(list, vec!["assets/images/Banners/Banner.jpg"]);

        let mut loader = FakeLoader { failing: vec!["assets/images/Banners/Banner.jpg"], ..Default::default() };
        let mut engine = SlideshowEngine::start(&list, &mut loader, Timing::GALLERY);
        assert!(engine.shows_fallback());

        engine.advance(HOLD_DURATION * 2);
        assert_eq!(engine.phase(), Phase::Holding);

        let mut compositor = RecordingCompositor::default();
        engine.render(&mut compositor, &mut ());
        assert!(compositor.frames.is_empty());
    }
}
