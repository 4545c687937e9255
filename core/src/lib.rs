//! Season state reconstruction for fantasy league teams.
//!
//! Turns already-fetched weekly history, chip usage, picks and the
//! player catalogue into one immutable `SquadSnapshot`. Every function
//! here is pure and synchronous; fetching belongs to a `SeasonSource`.

pub mod availability;
pub mod chips;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod free_transfers;
pub mod gameweek;
pub mod market;
pub mod price;
pub mod records;
pub mod snapshot;
pub mod source;
pub mod summary;
pub mod transfers;
pub mod types;
pub mod upstream;

pub use availability::{classify, PlayerAvailability};
pub use chips::{track_chips, ChipAvailability, ChipWindow};
pub use config::SeasonRules;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{SeasonError, SeasonResult};
pub use free_transfers::{accumulate, FreeTransferOutcome, FreeTransfers, TransferContext};
pub use price::{price_delta, resolve_price, PriceInfo, SellPriceSource};
pub use snapshot::{build_squad_snapshot, SnapshotInputs, SquadSnapshot, Staleness};
pub use source::{snapshot_from_source, SeasonSource, SnapshotRequest};
pub use types::{Event, PlayerId, Price, SeasonHalf, TeamId};
