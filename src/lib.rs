//! An interactive shell that turns each input line into one execution plan
//! (a single command, a `##` sequence, a `&&` concurrent group, a `>`
//! redirection or a `|` pipeline) and realizes it with `fork`/`exec`.

#[macro_use]
extern crate tracing;

pub mod builtins;
pub mod cmd;
pub mod config;
pub mod error;
pub mod parse;
pub mod prelude;
pub mod process;
pub mod signals;
pub mod state;
