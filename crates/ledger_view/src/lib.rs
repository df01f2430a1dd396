//! Client-side model of the ledger dashboard.
//!
//! The crate is free of I/O: records come in through [`RecordView::load`],
//! and everything else is a pure transformation of the loaded working set
//! (filter, search, sort, paginate), plus the helpers the presentation layer
//! needs around it (form validation, chart breakdowns, CSV export).
//!
//! ```rust
//! use ledger_view::{FilterCriteria, RecordView};
//!
//! let mut view = RecordView::new(25, chrono_tz::UTC);
//! view.load(Vec::new());
//! view.apply_filter(FilterCriteria::default());
//! let page = view.current_page();
//! assert_eq!(page.total, 0);
//! assert_eq!(page.page_number, 1);
//! ```

pub use analytics::{CategoryTotal, DayTotals, Summary};
pub use draft::{DateRange, RecordDraft};
pub use error::{DraftError, ExportError, RecordError};
pub use filter::{FilterCriteria, Period};
pub use intent::{Effect, Intent};
pub use money::Amount;
pub use page::Page;
pub use record::{Kind, Record};
pub use sort::SortOrder;
pub use view::RecordView;

pub mod analytics;
pub mod draft;
pub mod export;
pub mod filter;
pub mod page;
pub mod search;
pub mod sort;

mod error;
mod intent;
mod money;
mod record;
mod view;
