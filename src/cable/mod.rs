//! Cable type advisor for UK final circuits.
//!
//! A TOML-driven rule table maps an installation context (load, location,
//! cable run, protection needs, ambient temperature) to a recommended cable
//! construction with a justification and ranked alternatives.
//!
//! # Architecture
//!
//! - **Rules**: Loaded from TOML (embedded default or a custom file)
//! - **Evaluation**: Ordered, first match wins, fallback always answers
//! - **Requirements**: Load descriptions pre-fill parts of the context
//!
//! # Example
//!
//! ```ignore
//! use sparkadvisor::cable::{select_cable_type, CableSelectionContext, InstallationLocation};
//!
//! let context = CableSelectionContext {
//!     location: Some(InstallationLocation::Underground),
//!     ..Default::default()
//! };
//!
//! let selection = select_cable_type(&context);
//! println!("{}: {}", selection.cable_type.label(), selection.reason);
//! ```

mod engine;
mod requirements;
mod rules;
mod types;

pub use engine::{select_cable_type, CableAdvisor};
pub use requirements::{get_load_type_requirements, LoadRequirements};
pub use rules::{default_rules, load_rules, parse_rules};
pub use types::*;
