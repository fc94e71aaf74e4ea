//! Dashboard and community feed view logic.
//!
//! The HTTP API returns raw creation rows; this module carries the pure
//! client-side state and render models: the single-expansion accordion
//! and the card/feed views derived from it. Nothing here mutates a
//! creation.

pub mod accordion;
pub mod view;

pub use accordion::{Accordion, AccordionChange};
pub use view::{
    dashboard_summary, feed_cards, render_card, CardBody, CardHeader, CardView, DashboardSummary,
    FeedCard,
};
