//! Trade journal domain: the canonical schema, the typed record, form
//! normalization, and the derived KPIs.

pub mod checklist;
pub mod draft;
pub mod kpi;
pub mod record;
pub mod schema;
pub mod types;

pub use checklist::{ApproachChecklist, Confluences};
pub use draft::{ManualDateTime, NormalizedTrade, ResolvedDateTime, TradeDraft, resolve_datetime};
pub use kpi::{GoalPolicy, KpiInput, TradeKpis, compute_kpis, format_amount};
pub use record::{TIMESTAMP_FORMAT, TradeRecord};
pub use schema::{Column, header_labels, is_canonical_header};
pub use types::{Pair, Timing, TradeDirection, TradeResult};
