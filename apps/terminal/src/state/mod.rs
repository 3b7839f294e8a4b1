//! # State Module
//!
//! Manages terminal state.
//!
//! ## Why Multiple State Types?
//! Instead of a single `AppState` struct containing everything, each
//! concern gets its own type and each command takes only what it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌────────────┐  │
//! │  │ SessionState │  │   SalesLog   │  │ ConfigState  │  │  Catalog   │  │
//! │  │              │  │              │  │              │  │            │  │
//! │  │  Arc<Mutex<  │  │  Arc<Mutex<  │  │  store_name  │  │  products  │  │
//! │  │   Session    │  │   Vec<Order> │  │  tax_rate    │  │  (lomi-    │  │
//! │  │  >>          │  │  >>          │  │  fee         │  │   core)    │  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • SessionState: Arc<Mutex<T>> for exclusive access                    │
//! │  • SalesLog: Arc<Mutex<T>>, append-only                                │
//! │  • ConfigState / Catalog: read-only after initialization               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod history;
mod session;

pub use config::ConfigState;
pub use history::{MethodTotal, SalesLog, SalesReport};
pub use session::{Session, SessionState};
