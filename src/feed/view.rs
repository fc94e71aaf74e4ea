//! Render models for creation cards and the community feed.
//!
//! Rendering borrows from the creation and never copies or rewrites
//! `content`: an image card reproduces the stored URL exactly and a text
//! card hands the stored markdown through untouched. Styling the
//! markdown is the presentation layer's job.

use crate::models::creation::{Creation, CreationKind};
use crate::services::auth_service::Plan;

use super::accordion::Accordion;

/// Card header, always visible
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardHeader<'a> {
    pub prompt: &'a str,
    /// Kind badge
    pub kind: CreationKind,
    /// Creation date formatted for display
    pub created_at: String,
}

/// Card body, present only while the card is expanded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardBody<'a> {
    Image { url: &'a str },
    RichText { markdown: &'a str },
}

/// Read-only view of one dashboard card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView<'a> {
    pub header: CardHeader<'a>,
    pub expanded: bool,
    pub body: Option<CardBody<'a>>,
}

/// Build the view for one dashboard card
pub fn render_card<'a>(creation: &'a Creation, accordion: &Accordion) -> CardView<'a> {
    let expanded = accordion.is_expanded(creation.id);
    let body = expanded.then(|| match creation.kind {
        CreationKind::Image => CardBody::Image {
            url: &creation.content,
        },
        CreationKind::Article | CreationKind::BlogTitle => CardBody::RichText {
            markdown: &creation.content,
        },
    });

    CardView {
        header: CardHeader {
            prompt: &creation.prompt,
            kind: creation.kind,
            created_at: creation.created_at.format("%-m/%-d/%Y").to_string(),
        },
        expanded,
        body,
    }
}

/// Dashboard header stats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_creations: usize,
    pub plan: Plan,
}

pub fn dashboard_summary(creations: &[Creation], plan: Plan) -> DashboardSummary {
    DashboardSummary {
        total_creations: creations.len(),
        plan,
    }
}

/// One community feed tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedCard<'a> {
    pub url: &'a str,
    pub prompt: &'a str,
    pub like_count: usize,
    pub liked_by_me: bool,
}

/// Build the community feed for a viewer from the published creations
pub fn feed_cards<'a>(published: &'a [Creation], viewer_id: &str) -> Vec<FeedCard<'a>> {
    published
        .iter()
        .map(|creation| FeedCard {
            url: &creation.content,
            prompt: &creation.prompt,
            like_count: creation.likes.len(),
            liked_by_me: creation.likes.iter().any(|u| u == viewer_id),
        })
        .collect()
}
