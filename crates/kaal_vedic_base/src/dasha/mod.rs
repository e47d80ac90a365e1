//! Vimshottari dasha (planetary period) timelines.
//!
//! Generation runs in tiers from plain level-0 mahadashas to a full nested
//! tree or an active-chain snapshot. Resolution answers "what is running
//! now" over a tree that may also come from an external backend.

pub mod balance;
pub mod query;
pub mod resolve;
pub mod subperiod;
pub mod timeline;
pub mod types;
pub mod validate;
pub mod vimshottari;
pub mod vimshottari_data;

pub use balance::nakshatra_birth_balance;
pub use query::{active_chain, find_active_period};
pub use resolve::{CurrentDasha, resolve_current_dasha, resolve_validated};
pub use subperiod::{build_cyclic_sequence, proportional_children, snap_last_child_end};
pub use timeline::{TimelineSegment, timeline_segments};
pub use types::{
    DAYS_PER_YEAR, DEFAULT_DASHA_LEVEL, DashaLevel, DashaPeriod, MAX_DASHA_LEVEL,
    MAX_PERIODS_PER_LEVEL,
};
pub use validate::{BOUNDARY_TOLERANCE_DAYS, validate_periods};
pub use vimshottari::{
    vimshottari_children, vimshottari_cycle, vimshottari_cycle_from_moon, vimshottari_level0,
    vimshottari_level0_from_moon, vimshottari_snapshot, vimshottari_tree,
};
pub use vimshottari_data::{
    VIMSHOTTARI_GRAHAS, VIMSHOTTARI_TOTAL_YEARS, VIMSHOTTARI_YEARS, VimshottariConfig,
    vimshottari_config,
};
