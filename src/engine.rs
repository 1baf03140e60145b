use crate::error::LoadError;

/// A decoded image the compositors can sample from.
pub trait SlideImage {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
}

/// Turns a resolved image source into a decoded image.
pub trait ImageLoader {
    type Image: SlideImage;

    fn load(&mut self, source: &str) -> Result<Self::Image, LoadError>;
}

/// Everything a compositor needs to draw one frame.
#[derive(Debug)]
pub struct Frame<'a, I> {
    pub current: &'a I,
    pub next: &'a I,
    pub progress: f32,
    pub time: f32,
}

/// Draws a [`Frame`] onto some target (a raylib draw handle in the binary,
/// a recorder in tests).
pub trait Compositor<I, T: ?Sized> {
    fn composite(&mut self, target: &mut T, frame: &Frame<'_, I>);
}
