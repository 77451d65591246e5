//! Response parsing using the notion-client library.
//!
//! Listing envelopes are decoded item by item, so one object notion-client
//! cannot deserialize costs that one item rather than the whole batch.

use super::client::ApiResponse;
use super::notion_client_adapter::{convert_block, convert_page};
use super::types::{PaginatedResponse, RawListing};
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, NotionClientError, NotionErrorCode};
use crate::model::{Block, BlockKind, PageRecord};
use crate::types::NotionId;
use notion_client::objects::block::Block as NotionBlock;
use notion_client::objects::error::Error as NotionError;
use notion_client::objects::page::Page as NotionPage;
use serde_json::Value;

/// Returns the body of a successful response, or the decoded API error.
pub fn success_body(result: ApiResponse<String>) -> Result<String, AppError> {
    if result.status.is_success() {
        Ok(result.data)
    } else {
        Err(api_error(&result))
    }
}

/// Decodes the error carried by a non-success response.
pub fn api_error(result: &ApiResponse<String>) -> AppError {
    // Try to parse as NotionError first
    if let Ok(notion_error) = serde_json::from_str::<NotionError>(&result.data) {
        return NotionClientError::NotionApi {
            status: notion_error.status,
            code: notion_error.code,
            message: notion_error.message,
            request_id: notion_error.request_id,
        }
        .into();
    }

    // Fallback to generic error with HTTP status code
    AppError::NotionService {
        code: NotionErrorCode::from_http_status(result.status.as_u16()),
        message: format!("HTTP {} from {}", result.status, result.url),
        status: result.status,
    }
}

/// Deserializes a body, keeping a preview of it in the error.
fn parse_json<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        NotionClientError::Deserialization {
            source: e,
            body: preview(body),
        }
        .into()
    })
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let cut: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", cut)
    } else {
        body.to_string()
    }
}

/// Parse a page retrieval response into a full or restricted record.
pub fn parse_page_response(result: ApiResponse<String>) -> Result<PageRecord, AppError> {
    let url = result.url.clone();
    let body = success_body(result)?;
    let value: Value = parse_json(&body, &url)?;
    page_record_from_value(value)
}

/// Classifies a page object: without `properties` it is a partial object.
pub fn page_record_from_value(value: Value) -> Result<PageRecord, AppError> {
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::MalformedResponse("Missing 'id' field in page".to_string()))?;
    let id = NotionId::parse(id)?;

    if value.get("properties").is_none() {
        log::debug!("Page {} returned as a partial object", id);
        return Ok(PageRecord::Restricted { id });
    }

    let page: NotionPage =
        serde_json::from_value(value).map_err(|e| NotionClientError::Deserialization {
            source: e,
            body: format!("page {}", id),
        })?;
    Ok(PageRecord::Full(convert_page(page)?))
}

/// Parse one batch of workspace search results, keeping only pages.
pub fn parse_search_response(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<PageRecord>, AppError> {
    let url = result.url.clone();
    let body = success_body(result)?;
    let listing: RawListing = parse_json(&body, &url)?;

    let mut pages = Vec::with_capacity(listing.results.len());
    for item in listing.results {
        let object = item.get("object").and_then(Value::as_str).unwrap_or("");
        if object != "page" {
            log::debug!("Skipping search result of type '{}'", object);
            continue;
        }
        match page_record_from_value(item) {
            Ok(record) => pages.push(record),
            Err(e) => log::warn!("Skipping unreadable search result: {}", e),
        }
    }

    Ok(PaginatedResponse {
        results: pages,
        next_cursor: listing.next_cursor,
        has_more: listing.has_more,
    })
}

/// Parse one batch of block children.
pub fn parse_block_children_response(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<Block>, AppError> {
    let url = result.url.clone();
    let body = success_body(result)?;
    let listing: RawListing = parse_json(&body, &url)?;

    let blocks = listing
        .results
        .into_iter()
        .filter_map(block_from_value)
        .collect();

    Ok(PaginatedResponse {
        results: blocks,
        next_cursor: listing.next_cursor,
        has_more: listing.has_more,
    })
}

/// Converts one block, degrading to `Unsupported` when notion-client rejects it.
fn block_from_value(value: Value) -> Option<Block> {
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .and_then(|id| NotionId::parse(id).ok());
    let block_type = value
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    let has_children = value
        .get("has_children")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let converted = serde_json::from_value::<NotionBlock>(value)
        .map_err(AppError::from)
        .and_then(convert_block);

    match (converted, id) {
        (Ok(block), _) => Some(block),
        (Err(e), Some(id)) => {
            log::warn!(
                "Block {} of type '{}' could not be read ({}); rendering as unsupported",
                id,
                block_type,
                e
            );
            let mut block = Block::new(id, BlockKind::Unsupported { block_type });
            block.has_children = has_children;
            Some(block)
        }
        (Err(e), None) => {
            log::warn!("Skipping block without a usable id: {}", e);
            None
        }
    }
}
