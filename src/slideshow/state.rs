#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Phase {
    Holding,       // Current image fully visible, hold timer running
    Transitioning, // Blending current into next, progress running
}

/// What the engine ended up with after loading its sources.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Mode {
    Fallback, // Nothing loaded, the static grid stays visible
    Static,   // A single image, no transition loop
    Cycling,  // Two or more images, hold/transition loop
}
