pub mod clock;
pub mod dictionary;
pub mod display;
pub mod input;
pub mod game;      // Reveal/guess state machine
pub mod session;
pub mod renderer;  // ratatui drawing
pub mod engine;    // tokio event loop
