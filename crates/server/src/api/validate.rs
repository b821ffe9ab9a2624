//! Request validation.
//!
//! Handlers run these before calling a service, turning raw bodies and query
//! parameters into core inputs. Domain rules (future dispatch, duplicates)
//! stay in the ticket workflow.

use chrono::{DateTime, Utc};
use haulage_core::{
    parse_timestamp, BulkCreateTicketsRequest, CreateTicketRequest, SiteInput, TicketFilter,
    TruckInput, UpdateTicketRequest,
};

use super::sites::SiteBody;
use super::tickets::{BulkCreateTicketsBody, CreateTicketBody, FilterTicketsParams, UpdateTicketBody};
use super::trucks::TruckBody;
use super::ApiError;

/// Identifiers are positive integers.
pub fn id(value: i64, field: &str) -> Result<i64, ApiError> {
    if value < 1 {
        return Err(ApiError::bad_request(format!(
            "{} must be a positive integer",
            field
        )));
    }
    Ok(value)
}

fn required_text(value: String, field: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request(format!("{} must not be blank", field)));
    }
    Ok(trimmed.to_string())
}

fn timestamp(value: &str, field: &str) -> Result<DateTime<Utc>, ApiError> {
    parse_timestamp(value).map_err(|e| ApiError::bad_request(format!("{}: {}", field, e)))
}

pub fn site_input(body: SiteBody) -> Result<SiteInput, ApiError> {
    Ok(SiteInput {
        name: required_text(body.name, "name")?,
        address: required_text(body.address, "address")?,
        description: body.description,
    })
}

pub fn truck_input(body: TruckBody) -> Result<TruckInput, ApiError> {
    Ok(TruckInput {
        license: required_text(body.license, "license")?,
        site_id: id(body.site_id, "siteId")?,
    })
}

fn ticket_request(body: &CreateTicketBody, prefix: &str) -> Result<CreateTicketRequest, ApiError> {
    Ok(CreateTicketRequest {
        truck_id: id(body.truck_id, &format!("{}truckId", prefix))?,
        site_id: id(body.site_id, &format!("{}siteId", prefix))?,
        dispatched_time: timestamp(&body.dispatched_time, &format!("{}dispatchedTime", prefix))?,
    })
}

pub fn create_ticket(body: CreateTicketBody) -> Result<CreateTicketRequest, ApiError> {
    ticket_request(&body, "")
}

/// Every entry must be well-formed; errors name the offending index.
pub fn bulk_create(body: BulkCreateTicketsBody) -> Result<BulkCreateTicketsRequest, ApiError> {
    let tickets = body
        .tickets
        .iter()
        .enumerate()
        .map(|(i, ticket)| ticket_request(ticket, &format!("tickets[{}].", i)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BulkCreateTicketsRequest { tickets })
}

pub fn update_ticket(body: UpdateTicketBody) -> Result<UpdateTicketRequest, ApiError> {
    Ok(UpdateTicketRequest {
        truck_id: id(body.truck_id, "truckId")?,
        dispatched_time: timestamp(&body.dispatched_time, "dispatchedTime")?,
    })
}

pub fn ticket_filter(params: FilterTicketsParams) -> Result<TicketFilter, ApiError> {
    let mut filter = TicketFilter::new();

    if let Some(site_id) = params.site_id {
        filter = filter.with_site(id(site_id, "siteId")?);
    }

    if let Some(ref start) = params.start_date {
        filter = filter.with_start_date(timestamp(start, "startDate")?);
    }

    if let Some(ref end) = params.end_date {
        filter = filter.with_end_date(timestamp(end, "endDate")?);
    }

    Ok(filter)
}
