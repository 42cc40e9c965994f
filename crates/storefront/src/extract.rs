//! Request extractors whose rejections render as [`AppError`] JSON bodies.
//!
//! The stock `axum` extractors answer malformed input with plain text. These
//! wrap them so that every error leaving the API has the `{"error": ...}`
//! shape.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
