//! Pipeline stages for carousel generation.
//!
//! Each submodule implements one step. Keeping them separate makes the pure
//! layout rules testable without rendering anything, and the external-tool
//! stage testable without building a deck.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ background ──▶ generate ──▶ convert
//! (JSON)    (resvg PNG)    (PPTX)       (soffice → pdftoppm)
//!                 ▲
//!        layout + components
//! ```
//!
//! 1. [`input`]: read and validate the carousel JSON, derive output paths
//! 2. [`background`]: rasterise the gradient once; runs in `spawn_blocking`
//! 3. [`layout`]: title wrapping, truncation and line placement rules
//! 4. [`components`]: brand header, swipe cue and glass card on any `Canvas`
//! 5. [`generate`]: assemble slides and write the `.pptx` atomically
//! 6. [`convert`]: drive the external converters with timeouts

pub mod background;
pub mod components;
pub mod convert;
pub mod generate;
pub mod input;
pub mod layout;
