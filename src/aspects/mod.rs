//! Standard config aspects.
//!
//! | Aspect          | Merges                 | Lint rules                                   | Validators      |
//! |-----------------|------------------------|----------------------------------------------|-----------------|
//! | `documentation` | `documentation.rules`  | `documentation-deprecated`                   |                 |
//! | `versioning`    |                        | `versioning-config-version`                  |                 |
//! | `http`          | `http.rules`, options  | `http-reserved-keyword`                      | `http-bindings` |
//! | `naming`        |                        | `naming-service-name`, `naming-identifier`   |                 |
//! | `visibility`    | `visibility.rules`     |                                              |                 |

pub mod documentation;
pub mod http;
pub mod naming;
pub mod version;
pub mod visibility;

pub use documentation::{DocumentationAttribute, DocumentationConfigAspect};
pub use http::HttpConfigAspect;
pub use naming::NamingConfigAspect;
pub use version::VersionConfigAspect;
pub use visibility::{VisibilityAttribute, VisibilityConfigAspect, scoper_for_labels};
