//! Layered configuration resolution.
//!
//! Produces one validated [`Config`] from three tiers, lowest to highest:
//! 1. **Defaults** - Built-in values per section (see [`SectionDefaults`])
//! 2. **File** - Optional YAML file passed on the command line
//! 3. **Environment** - `REGWATCH_*` variables (see [`env`] for the naming)
//!
//! ## Merge Strategy
//! - File and environment are deep-merged field by field; environment wins
//! - Lists of structs (`regopts`) merge by position, scalar lists are replaced
//! - Defaults only fill leaves no source set, and only inside sections that
//!   exist: a notification channel or provider nobody mentioned stays `None`
//!
//! ## Example
//! ```
//! use regwatch::config::{Environ, LoadOptions, TriBool, resolve};
//!
//! let env: Environ = [("REGWATCH_PROVIDERS_DOCKER", "true")].into_iter().collect();
//! let config = resolve(&LoadOptions::default(), &env).unwrap();
//! let docker = config.providers.unwrap().docker.unwrap();
//! assert_eq!(docker.tls_verify, TriBool::True);
//! assert_eq!(config.watch.workers, 10);
//! ```

mod coerce;
pub mod defaults;
pub mod env;
mod loader;
mod merge;
mod render;
mod schedule;
mod schema;
mod tribool;
mod types;
mod validate;

pub use defaults::SectionDefaults;
pub use env::{ENV_PREFIX, Environ, bind_env};
pub use loader::{ConfigLoader, ConfigTier, LoadOptions, load_file, resolve};
pub use merge::{decode, deep_merge, finalize};
pub use render::{RenderFormat, render};
pub use schedule::{WatchSchedule, parse_schedule};
pub use tribool::TriBool;
pub use types::*;
pub use validate::{ValidateOptions, validate};
