//! Library side of the sheetops CLI: session state, rendering, the
//! interactive loop and logging setup.

pub mod logging;
pub mod render;
pub mod repl;
pub mod session;
