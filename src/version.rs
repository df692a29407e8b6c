// Copyright (c) 2024 Mike Tsao

//! Reports which build of the crate is running.

// https://stackoverflow.com/a/65972328/344467
/// The git description if the build script environment provided one, then the
/// git revision, then the crate version.
pub fn app_version() -> &'static str {
    option_env!("GIT_DESCRIBE")
        .or(option_env!("GIT_REV_PARSE"))
        .unwrap_or(env!("CARGO_PKG_VERSION"))
}
