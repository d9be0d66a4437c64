// Library root for the `oche` command-line application: configuration,
// input loading, the proposal runner and output rendering.

pub mod config;
pub mod input;
pub mod render;
pub mod runner;
