//! Board synchronization — the client-side state of a task board.
//!
//! ## Overview
//!
//! The presentation layer never edits the board directly. It calls one of the
//! synchronizer's operations, which applies the change to the local board
//! right away (optimistically), asks the persistence service to store it, and
//! rolls the board back if the service refuses.
//!
//! ```text
//! ┌──────────────┐  move/add/edit/delete  ┌─────────────────────────────┐
//! │ Presentation │ ─────────────────────> │ sync.rs (BoardSynchronizer) │
//! │    layer     │ <───── watch<Board> ── │   ├─ transition.rs (pure)   │
//! └──────────────┘                        │   └─ ordering.rs            │
//!                                         └──────────────┬──────────────┘
//!                                                        │ PersistenceService
//!                                                        v
//!                                         persistence::{HttpPersistence,
//!                                                       LocalPersistence}
//! ```
//!
//! | Module       | Responsibility                                        |
//! |--------------|-------------------------------------------------------|
//! | `ordering`   | canonical column order, load-time sort, index rules   |
//! | `transition` | pure `Board -> Board` functions for each operation    |
//! | `sync`       | snapshot, publish, reconcile, revert; single flight   |

pub mod ordering;
pub mod sync;
pub mod transition;

pub use sync::BoardSynchronizer;
pub use transition::{Applied, TaskMove};
