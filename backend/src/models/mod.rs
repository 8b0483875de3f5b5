pub mod analysis;
pub mod navigation;

pub use analysis::{
    AnalysisRecord, AnalysisRow, FinancialHighlights, FinancialMetric, Nullable, SectionItem, SignificantQuote,
};
pub use navigation::{
    Direction, NavigationContext, NavigationResponse, SearchMode, SearchParams, SearchQuery,
    UniverseBounds,
};
