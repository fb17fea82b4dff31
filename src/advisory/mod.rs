//! CVE advisory text analysis.
//!
//! - [`scanner`] — extracts official Oracle advisory URLs from a delimited
//!   references field.
//! - [`weblogic`] — derives the WebLogic relevance flag from a record's
//!   textual fields and its extracted advisories.

pub mod scanner;
pub mod weblogic;
