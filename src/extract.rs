use axum::extract::FromRequest;

use crate::error::Error;

/// [`axum::Json`] whose rejections go through [`Error`], so a missing field,
/// a bad value or a wrong content type answers 400 with a `message` body.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);
