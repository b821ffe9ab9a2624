//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Ticket creation (single and bulk)
//! - Rejected ticket batches by reason

use once_cell::sync::Lazy;
use prometheus::{IntCounterVec, Opts};

/// Tickets written, labelled by creation path ("single" or "bulk").
pub static TICKETS_CREATED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "haulage_tickets_created_total",
            "Total tickets created since startup",
        ),
        &["path"],
    )
    .unwrap()
});

/// Ticket requests rejected by the workflow, labelled by error code.
pub static TICKET_REJECTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "haulage_ticket_rejections_total",
            "Ticket create requests rejected before anything was written",
        ),
        &["reason"],
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(TICKETS_CREATED.clone()),
        Box::new(TICKET_REJECTIONS.clone()),
    ]
}
