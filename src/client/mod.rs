//! Client side of the list browser.
//!
//! - [`transport`]: the [`CatalogClient`] seam and its HTTP / in-process
//!   implementations
//! - [`paging`]: pure helpers deciding which page to request and how to merge it
//! - [`session`]: the [`BrowserSession`] state machine

pub mod paging;
pub mod session;
pub mod transport;

pub use paging::{PAGE_SIZE, PagePlan, Viewport, append_unique, move_item};
pub use session::{BrowserSession, Cursor};
pub use transport::{
    CatalogClient, ClientConfig, ClientError, DEFAULT_BASE_URL, HttpCatalogClient,
    LocalCatalogClient,
};
