//! Test helpers shared across crates in the strata workspace.
//!
//! - [`env`]: guarded mutation of environment variables such as
//!   `APP_ROOT_PATH`;
//! - [`cwd`]: guarded changes of the process working directory;
//! - [`figment`]: running setup code inside a sandboxed `figment::Jail`.

pub mod cwd;
pub mod env;
pub mod figment;
