pub mod errors;
pub mod models;
pub mod search;

pub use errors::{ApiError, SearchError};
pub use models::SearchParams;
pub use search::{
    FieldDescriptor, FieldType, Normalizer, OptionRegistry, QueryBuilder, RawDescriptor,
    RawSearchConfig, SearchConfig, SiteConfig, WhereClauses, apply_search,
};
