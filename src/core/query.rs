use crate::core::resolver::SummaryRefs;
use crate::domain::model::{AggregateQuery, Cut, Drilldown};

/// Large enough to return every department in one page.
pub const DEFAULT_PAGE_SIZE: usize = 10000;
pub const DEFAULT_PHASE: &str = "Main appropriation";
pub const DEFAULT_FINANCIAL_YEAR: &str = "2019";

/// Literal values the summary filters on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFilters {
    pub phase: String,
    pub financial_year: String,
}

impl Default for SummaryFilters {
    fn default() -> Self {
        Self {
            phase: DEFAULT_PHASE.to_string(),
            financial_year: DEFAULT_FINANCIAL_YEAR.to_string(),
        }
    }
}

/// Department totals for one budget phase and financial year.
pub fn build_summary_query(
    refs: &SummaryRefs,
    filters: &SummaryFilters,
    page_size: usize,
) -> AggregateQuery {
    AggregateQuery {
        page_size,
        cuts: vec![
            Cut::new(&refs.phase, &filters.phase),
            Cut::new(&refs.date, &filters.financial_year),
        ],
        drilldowns: vec![Drilldown(refs.administrative.clone())],
    }
}
