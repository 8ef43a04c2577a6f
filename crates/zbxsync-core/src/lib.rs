//! Declarative host resource model and reconciliation core for zbxsync.
//!
//! This crate owns the state-reconciliation contract for one managed entity
//! type, the Zabbix host: how a desired-state record is declared, migrated,
//! normalized and validated, and how each property is compared against
//! observed state to build a minimal changeset. Transport, scheduling and
//! the apply step live in external collaborators; nothing here performs I/O.

pub mod diagnostics;
pub mod error;
pub mod host;
pub mod input;
pub mod munge;
pub mod sync;

pub use diagnostics::{DiagnosticSink, MemorySink, TracingSink};
pub use error::{CoreError, ErrorCategory, Result};
pub use host::{API_CONFIG_FILE, Ensure, HostSpec, Macro};
pub use input::{HostInput, migrate};
pub use munge::{TlsMode, munge_boolean, munge_encryption};
pub use sync::{Changeset, Property, SyncRule, diff, needs_change, property_in_sync};
