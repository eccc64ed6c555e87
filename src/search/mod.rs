//! # Index-based Search
//!
//! Translates the compact filter expressions sent by admin list views into
//! query clauses.
//!
//! ## Search configs
//!
//! Each resource declares its searchable fields once, in shorthand:
//!
//! ```rust,ignore
//! let raw = RawSearchConfig::new()
//!     .text("title")
//!     .typed("status", "select")
//!     .locale()
//!     .field(
//!         "category",
//!         RawDescriptor::new().field_type("select").options_from("Category::all()"),
//!     );
//!
//! let config: SearchConfig<Select<article::Entity>> =
//!     Normalizer::new(&site_settings, &option_registry).longhand(raw)?;
//! ```
//!
//! The [`Normalizer`] expands every entry into a [`FieldDescriptor`] with a
//! type, a label and, for selects, resolved options. Field order is kept:
//! clients refer to fields by position.
//!
//! ## Filter expressions
//!
//! The client sends a JSON list of `[fieldIndex, comparison, input]` triples:
//!
//! ```text
//! GET /admin/articles?query=[[0,"%*%","rust"],[1,"=","live"]]
//! ```
//!
//! | comparison | clause |
//! |---|---|
//! | `%*%` / `*%` / `%*` | `field LIKE %input%` / `input%` / `%input` |
//! | `!%*%` | `field NOT LIKE %input%` |
//! | anything else | `field <comparison> input` |
//!
//! [`apply_search`] adds one clause per triple to any [`QueryBuilder`]:
//! sea-orm `Select`s and `Condition`s, or the recording [`WhereClauses`].

pub mod conditions;
pub mod config;
pub mod labels;
pub mod longhand;
pub mod options;
pub mod query;
pub mod shorthand;
pub mod site;

pub use conditions::{FilterCondition, apply_search, default_clause, parse_filter_expression};
pub use config::{
    FieldDescriptor, FieldOptions, FieldQuery, FieldType, QueryCallback, SearchConfig,
    SelectOptions,
};
pub use labels::title_from_key;
pub use longhand::Normalizer;
pub use options::{OptionReference, OptionRegistry, OptionSource};
pub use query::{QueryBuilder, WhereClause, WhereClauses, comparison_expr};
pub use shorthand::{LOCALE_MARKER, RawDescriptor, RawEntry, RawKey, RawSearchConfig};
pub use site::{LOCALES_KEY, SiteConfig};
