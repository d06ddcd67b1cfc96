//! Client-side view state.
//!
//! DESIGN
//! ======
//! The listing itself lives in `listing::ListingSession`. These modules hold
//! only presentation concerns (current step, busy flags, scanner inputs) so
//! the domain model stays free of UI details.

pub mod scan;
pub mod ui;
