// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! tapline: streaming parser for the Test Anything Protocol
//!
//! This library crate consumes TAP streams (versions up to 13) from any
//! `Read` source in a single forward pass, producing a typed
//! [`TestSession`]: test points with directives, attached YAML metadata
//! and diagnostics, the declared plan, and bail-out state. Tests the
//! plan promised but the stream never delivered are synthesized as
//! failures during end-of-stream reconciliation.
//!
//! Callers that want results as they happen register listeners on the
//! parser's event channels; see [`TapParser`].
//!
//! # Example
//!
//! ```
//! use tapline::prelude::*;
//!
//! let input = "TAP version 13\n1..3\nok 1 - database connects\nnot ok 2 - cache warms up\nok 3 - clean shutdown # SKIP flaky on CI\n";
//!
//! let session = parse_str(input)?;
//! assert_eq!(session.version, 13);
//! assert_eq!(session.test_count(), 3);
//! assert_eq!(session.failures().len(), 1);
//! assert!(session.results[2].skipped);
//! # Ok::<(), ParseError>(())
//! ```

#![warn(missing_docs)]

pub mod directive;
pub mod error;
pub mod events;
pub mod line;
pub mod parser;
pub mod result;
pub mod session;
mod yaml;

pub use directive::Directive;
pub use error::ParseError;
pub use events::ListenerResult;
pub use line::{LineKind, classify};
pub use parser::{MAX_TAP_VERSION, TapParser, parse, parse_str};
pub use result::{TestPlan, TestResult, TestStatus};
pub use session::TestSession;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::ParseError;
    pub use crate::events::ListenerResult;
    pub use crate::parser::{MAX_TAP_VERSION, TapParser, parse, parse_str};
    pub use crate::result::{TestPlan, TestResult, TestStatus};
    pub use crate::session::TestSession;
}
