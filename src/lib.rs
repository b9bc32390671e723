//! Liquid-style template tags for documentation sources.
//!
//! The [`liquid`] module is the interpreter itself. The remaining modules
//! are the plumbing the `undox-liquid` binary uses to load settings and
//! variables from disk and run documents through it.

pub mod config;
pub mod liquid;
pub mod pipeline;
pub mod util;
pub mod variables;

pub use liquid::{
    Filter, FilterRegistry, Liquid, LiquidError, Settings, Template, Value, Variables, render,
};
