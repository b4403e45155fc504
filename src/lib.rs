//! OpenAPI `$ref` resolution
//!
//! Resolves internal `#/components/schemas/<Name>` references in the `paths`
//! section of an OpenAPI document, either by inlining the definitions or by
//! repointing the references at a root `$defs` block.
//!
//! # Example
//!
//! ```
//! use openapi_deref::{resolve_refs, resolve_refs_with_defs};
//! use serde_json::json;
//!
//! let document = json!({
//!     "paths": {
//!         "/pets": {
//!             "get": { "schema": { "$ref": "#/components/schemas/Pet" } }
//!         }
//!     },
//!     "components": {
//!         "schemas": {
//!             "Pet": {
//!                 "type": "object",
//!                 "properties": {
//!                     "name": { "type": "string" },
//!                     "parent": { "$ref": "#/components/schemas/Pet" }
//!                 }
//!             }
//!         }
//!     }
//! });
//!
//! let inlined = resolve_refs(&document);
//! let schema = &inlined["paths"]["/pets"]["get"]["schema"];
//! assert_eq!(schema["properties"]["name"]["type"], "string");
//! // The self-reference is kept so resolution terminates
//! assert_eq!(schema["properties"]["parent"]["$ref"], "#/components/schemas/Pet");
//!
//! let rewritten = resolve_refs_with_defs(&document);
//! assert_eq!(rewritten["paths"]["/pets"]["get"]["schema"]["$ref"], "#/$defs/Pet");
//! assert_eq!(rewritten["$defs"]["Pet"], document["components"]["schemas"]["Pet"]);
//! ```
//!
//! # Reference Handling
//!
//! | Reference | Inline | Defs |
//! |-----------|--------|------|
//! | `#/components/schemas/<Name>`, defined | Replaced by resolved copy | Rewritten to `#/$defs/<Name>` |
//! | Already open on the resolution path | Kept | Rewritten |
//! | `#/components/schemas/<Name>`, undefined | Kept (error in strict mode) | Rewritten (error in strict mode) |
//! | Anything else | Kept | Kept |

mod checker;
mod error;
mod loader;
mod registry;
mod resolver;
mod types;

pub use checker::{
    check, check_document, check_file, CheckResult, Diagnostic, FileResult, FileStatus, Severity,
};
pub use error::ResolveError;
pub use loader::{is_url, load_document, load_document_auto, load_document_str};
pub use registry::{definition_name, Lookup, Registry};
pub use resolver::{
    resolve, resolve_refs, resolve_refs_with_defs, resolve_with_report, rewrite_pointer,
    Resolution, UnresolvedReason, UnresolvedRef,
};
pub use types::{
    as_reference, ResolveOptions, Strategy, DEFS_KEY, DEFS_REF_PREFIX, PATHS_KEY, REF_KEY,
    SCHEMA_REF_PREFIX,
};

#[cfg(feature = "remote")]
pub use loader::load_document_url;
