/// Log capture, configuration shorthands, and trace replay.
pub mod harness;
