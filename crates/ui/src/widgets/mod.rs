pub mod glow;
