//! Core module: UI-agnostic playback state machine.
//!
//! This module contains:
//! - `timer`: Deterministic timer queue driven by a virtual clock
//! - `trigger`: One-shot "once visible" playback trigger
//! - `reveal`: Reveal unit (one message's typing/reveal lifecycle)
//! - `sequencer`: Orchestrates reveal units (step, autoplay, reset)
//! - `interrupt`: Signal handling for graceful interruption

pub mod interrupt;
pub mod reveal;
pub mod sequencer;
pub mod timer;
pub mod trigger;
