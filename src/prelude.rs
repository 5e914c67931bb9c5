pub use crate::{
    error::{ShellError, ShellResult},
    process::{Binding, LaunchSpec, Spawner},
};
