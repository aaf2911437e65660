pub mod browser;
pub mod debounce;
pub mod query;
pub mod speculative;

pub use browser::{
    CatalogBrowser, CatalogPage, DisplayState, FetchTicket, PendingDelete, ViewState,
};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE_WINDOW};
pub use query::CatalogQuery;
pub use speculative::Speculation;
