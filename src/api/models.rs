use poem_openapi::{ApiResponse, Object, payload::{Json, PlainText}};

use crate::delivery::DeliveryReport;
use crate::domain::models::Position;

#[derive(Debug, Clone, Object)]
pub struct ErrorDto {
    /// Human-readable error message
    pub message: String,
}

impl From<String> for ErrorDto {
    fn from(message: String) -> Self {
        ErrorDto { message }
    }
}

#[derive(Debug, Clone, Object)]
pub struct PositionDto {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    /// e.g. "John 3:16"
    pub reference: String,
}

impl From<Position> for PositionDto {
    fn from(p: Position) -> Self {
        PositionDto {
            reference: p.to_string(),
            book: p.book,
            chapter: p.chapter,
            verse: p.verse,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct CursorDto {
    pub subscriber: String,
    /// Next verse this subscriber will receive
    pub next: PositionDto,
}

#[derive(Debug, Clone, Object)]
pub struct PreferenceDto {
    pub subscriber: String,
    pub batch_size: u32,
}

#[derive(Debug, Clone, Object)]
pub struct PreferenceUpdateDto {
    /// Verses per delivery; values outside 1..=5 are clamped
    pub batch_size: i64,
}

#[derive(Debug, Clone, Object)]
pub struct DeliveryReportDto {
    pub subscriber: String,
    pub passages: u64,
    pub sent: u64,
    pub failed_sends: u64,
}

impl From<DeliveryReport> for DeliveryReportDto {
    fn from(r: DeliveryReport) -> Self {
        DeliveryReportDto {
            subscriber: r.subscriber,
            passages: r.passages as u64,
            sent: r.sent as u64,
            failed_sends: r.failed_sends as u64,
        }
    }
}

#[derive(ApiResponse)]
pub enum CursorResponseDto {
    #[oai(status = 200)]
    Ok(Json<CursorDto>),

    /// Cursor store unavailable
    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum PreferenceResponseDto {
    #[oai(status = 200)]
    Ok(Json<PreferenceDto>),

    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum DeliveryResponseDto {
    /// Batch delivered (individual sends may still have failed)
    #[oai(status = 200)]
    Ok(Json<DeliveryReportDto>),

    /// A scheduled pass or another delivery is running
    #[oai(status = 409)]
    Conflict(Json<ErrorDto>),

    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum PassResponseDto {
    /// Pass started in the background
    #[oai(status = 202)]
    Accepted(PlainText<String>),

    #[oai(status = 409)]
    Conflict(Json<ErrorDto>),
}
