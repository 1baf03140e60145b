use std::time::Duration;

pub const WINDOW_WIDTH: i32 = 1280;           // Default window width
pub const WINDOW_HEIGHT: i32 = 720;           // Default window height
pub const FPS: u32 = 60;                      // Target frames per second

pub const HOLD_DURATION: Duration = Duration::from_millis(2800);       // Time each image stays fully visible
pub const TRANSITION_DURATION: Duration = Duration::from_millis(1600); // Time the displacement blend takes
pub const HERO_HOLD_DURATION: Duration = Duration::from_millis(5000);  // Hero slider interval
pub const HERO_TRANSITION_DURATION: Duration = Duration::from_millis(900);

pub const ASSETS_IMAGES_ROOT: &str = "assets/images";
pub const GALLERY_MANIFEST: &str = "assets/images/gallery.json";
pub const HERO_MANIFEST: &str = "assets/images/slider.json";

pub const GALLERY_FALLBACK: &[&str] = &["assets/images/Rajiv-Pic.jpg", "assets/images/Banners/Banner.jpg"];
pub const HERO_FALLBACK: &[&str] = &["assets/images/Banners/Banner.jpg"];

pub const SWIPE_THRESHOLD: f32 = 30.0;        // Horizontal pixels before a drag counts as a swipe
pub const GALLERY_HINT: &str = "क्लिक करें / ← → तस्वीर बदलें";
