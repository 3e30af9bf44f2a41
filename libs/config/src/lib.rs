//! # StableSwap Configuration
//!
//! Layered configuration for the StableSwap binaries: defaults, an optional
//! TOML file, then `STABLESWAP_*` environment overrides.
//!
//! ## Sections
//!
//! - **`[solver]`**: Newton iteration caps for `D` and `y` (1..=255)
//! - **`[logging]`**: default log filter and JSON output toggle
//!
//! ## Usage
//!
//! ```rust
//! use stableswap_config::StableSwapConfig;
//!
//! let settings = StableSwapConfig::from_toml_str(
//!     "[solver]\nmax_d_iterations = 128\n",
//! ).unwrap();
//! let limits = settings.solver.limits().unwrap();
//! assert_eq!(limits.max_d_iterations, 128);
//! assert_eq!(limits.max_y_iterations, 255);
//! ```

pub mod settings;

// Re-export commonly used types
pub use settings::{LoggingSettings, SolverSettings, StableSwapConfig, ENV_PREFIX};
pub use stableswap_amm::SolverLimits;
