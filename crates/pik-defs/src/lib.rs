//! Reads the line oriented object definition format into live objects.
//!
//! ```text
//! OBJECT=COUNTER
//! COUNTER:TYPE=INTEGER
//! COUNTER:VALUE=0
//! COUNTER:ONCHANGED^3={LOG.INC()}
//! ```
//!
//! Every script a definition carries is parsed here, once.

mod error;
mod fields;
mod instantiate;
mod source_parse;

use pik_core::ObjectHandle;

pub use error::DefinitionError;
pub use instantiate::instantiate;
pub use source_parse::{parse_definitions, RawDefinition, RawField};

/// Parses `text` and builds its objects in file order.
pub fn load_definitions(text: &str) -> Result<Vec<ObjectHandle>, DefinitionError> {
    parse_definitions(text)?
        .iter()
        .map(instantiate)
        .collect()
}
